//! Simulation parameters. A `Parameters` value is immutable once a simulation has been built
//! from it; [`Parameters::validate`] is the only gate between a configuration and a simulation.
//!
//! Parameters can be built in code with [`ParametersBuilder`] or loaded from a JSON object in
//! which every field is optional:
//!
//! ```json
//! { "population": 500, "prob_trans_unmasked": 0.9, "infection_period": 20 }
//! ```
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use derive_builder::Builder;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Ranges a control panel would offer for each parameter. These are guidance only: values
/// outside them are accepted as long as they pass [`Parameters::validate`].
pub struct SuggestedBounds;

impl SuggestedBounds {
    pub const POPULATION: RangeInclusive<usize> = 5..=5000;
    pub const FRACTION: RangeInclusive<f64> = 0.0..=1.0;
    pub const INFECTION_PERIOD: RangeInclusive<u32> = 5..=200;
    pub const IMMUNITY_PERIOD: RangeInclusive<u32> = 10..=1000;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Builder)]
#[serde(default)]
#[builder(build_fn(private, name = "build_unchecked"))]
pub struct Parameters {
    /// Number of agents; fixed for the lifetime of a simulation.
    #[builder(default = "100")]
    pub population: usize,

    #[builder(default = "50")]
    pub width: usize,

    #[builder(default = "50")]
    pub height: usize,

    /// Probability that an agent starts out infected.
    #[builder(default = "0.2")]
    pub init_infected: f64,

    /// Probability that an agent wears a mask.
    #[builder(default = "0.5")]
    pub perc_masked: f64,

    #[builder(default = "0.25")]
    pub prob_trans_masked: f64,

    #[builder(default = "0.75")]
    pub prob_trans_unmasked: f64,

    /// Ticks from infection to recovery.
    #[builder(default = "50")]
    pub infection_period: u32,

    /// Ticks from recovery until the agent is susceptible again.
    #[builder(default = "200")]
    pub immunity_period: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        ParametersBuilder::default().build_unchecked().unwrap()
    }
}

impl ParametersBuilder {
    /// Builds the parameters, filling unset fields with their defaults.
    ///
    /// # Errors
    ///
    /// `ParametersBuilderError::ValidationError` if [`Parameters::validate`] rejects the result.
    pub fn build(&self) -> Result<Parameters, ParametersBuilderError> {
        let parameters = self.build_unchecked()?;
        parameters.validate().map_err(|e| e.to_string())?;
        Ok(parameters)
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), SimError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SimError::ConfigurationError(format!(
            "{name} must be a probability in [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: u64) -> Result<(), SimError> {
    if value == 0 {
        return Err(SimError::ConfigurationError(format!(
            "{name} must be positive"
        )));
    }
    Ok(())
}

impl Parameters {
    /// Rejects non-positive sizes and durations, grids with more cells than an `i64` can count,
    /// and probabilities outside `[0, 1]`.
    ///
    /// # Errors
    ///
    /// `SimError::ConfigurationError` naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        check_positive("population", self.population as u64)?;
        check_positive("width", self.width as u64)?;
        check_positive("height", self.height as u64)?;
        if self
            .width
            .checked_mul(self.height)
            .and_then(|cells| i64::try_from(cells).ok())
            .is_none()
        {
            return Err(SimError::ConfigurationError(format!(
                "width x height overflows: {} x {}",
                self.width, self.height
            )));
        }
        check_probability("init_infected", self.init_infected)?;
        check_probability("perc_masked", self.perc_masked)?;
        check_probability("prob_trans_masked", self.prob_trans_masked)?;
        check_probability("prob_trans_unmasked", self.prob_trans_unmasked)?;
        check_positive("infection_period", u64::from(self.infection_period))?;
        check_positive("immunity_period", u64::from(self.immunity_period))?;
        Ok(())
    }

    /// Names of the fields that fall outside [`SuggestedBounds`].
    pub fn outside_suggested_bounds(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !SuggestedBounds::POPULATION.contains(&self.population) {
            fields.push("population");
        }
        for (name, value) in [
            ("init_infected", self.init_infected),
            ("perc_masked", self.perc_masked),
            ("prob_trans_masked", self.prob_trans_masked),
            ("prob_trans_unmasked", self.prob_trans_unmasked),
        ] {
            if !SuggestedBounds::FRACTION.contains(&value) {
                fields.push(name);
            }
        }
        if !SuggestedBounds::INFECTION_PERIOD.contains(&self.infection_period) {
            fields.push("infection_period");
        }
        if !SuggestedBounds::IMMUNITY_PERIOD.contains(&self.immunity_period) {
            fields.push("immunity_period");
        }
        fields
    }

    pub(crate) fn warn_outside_suggested_bounds(&self) {
        for field in self.outside_suggested_bounds() {
            warn!("parameter {field} is outside its suggested range");
        }
    }

    /// Parses a JSON object; missing fields take their default values.
    ///
    /// # Errors
    ///
    /// `SimError::JsonError` for malformed input, `SimError::ConfigurationError` for invalid
    /// values.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let parameters: Parameters = serde_json::from_str(json)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Reads parameters from a JSON file. See [`Parameters::from_json_str`].
    ///
    /// # Errors
    ///
    /// `SimError::IoError` if the file cannot be read, otherwise as `from_json_str`.
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
