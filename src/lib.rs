//! A spatial agent-based epidemic model with masking.
//!
//! A fixed population of agents wanders a bounded 2D grid, one cell (or none) along each axis
//! per tick. Agents that share a cell are in contact. Each agent is Susceptible, Infected or
//! Immune:
//! * a susceptible agent in contact with an infected agent becomes infected with a probability
//!   that depends on whether it wears a mask;
//! * an infected agent recovers, and becomes immune, after a fixed number of ticks;
//! * immunity wanes after a fixed number of ticks, and the agent is susceptible again.
//!
//! The central object is the [`Simulation`], which owns the agents, the [`Grid`], a single
//! seeded random source and the [`MetricsSeries`] of population counts. A renderer or a chart
//! reads [`Simulation::snapshot`] and [`Simulation::metrics`] after each [`Simulation::tick`].
//!
//! ```rust
//! use grid_sir::prelude::*;
//!
//! let parameters = ParametersBuilder::default().population(500).build().unwrap();
//! let mut simulation = Simulation::new(parameters, 42).unwrap();
//! for _ in 0..10 {
//!     let counts = simulation.tick();
//!     assert_eq!(counts.total(), 500);
//! }
//! assert_eq!(simulation.metrics().len(), 11);
//! ```
pub mod agent;
pub use agent::{Agent, AgentId, EpidemicState};

pub mod error;
pub use error::SimError;

pub mod grid;
pub use grid::{Grid, Position};

pub mod hashing;
pub mod log;

pub mod metrics;
pub use metrics::{Counts, MetricsRecord, MetricsSeries};

pub mod parameters;
pub use parameters::{Parameters, ParametersBuilder, SuggestedBounds};

pub mod random;
pub use random::RandomSource;

pub mod runner;
pub use runner::{run_with_args, run_with_custom_args, BaseArgs};

pub mod simulation;
pub use simulation::{ActivationOrder, AgentSnapshot, InitialAgent, Simulation};

pub mod prelude;

// Re-exports for downstream crates
pub use rand;
pub use serde;
pub use serde_json;
