//! The population and its scheduler.
//!
//! A [`Simulation`] owns the agents, the grid, the random source and the metrics series. Each
//! call to [`Simulation::tick`] activates every agent exactly once and then records the
//! population counts. Two simulations built from the same parameters and seed, with the same
//! activation order, produce identical runs.
use log::{debug, info};
use serde::Serialize;

use crate::agent::{step_agent, Agent, AgentId, EpidemicState};
use crate::error::SimError;
use crate::grid::{Grid, Position};
use crate::metrics::{Counts, MetricsSeries};
use crate::parameters::Parameters;
use crate::random::RandomSource;

/// The order in which agents are activated within a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ActivationOrder {
    /// Agent ids are shuffled once per tick.
    #[default]
    Shuffled,
    /// Agents are activated in id order. Only useful for tests.
    Sequential,
}

/// An explicitly specified agent for [`Simulation::with_agents`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InitialAgent {
    pub masked: bool,
    pub infected: bool,
    /// Ticks until recovery for an infected agent. Zero means the full infection period.
    pub recovery_countdown: u32,
    /// Cell to place the agent in, or `None` for a uniformly random cell.
    pub position: Option<(i64, i64)>,
}

/// What a renderer needs to know about one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub x: usize,
    pub y: usize,
    pub masked: bool,
    pub infected: bool,
    pub immune: bool,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        let Position { x, y } = agent.position();
        AgentSnapshot {
            id: agent.id(),
            x,
            y,
            masked: agent.masked(),
            infected: agent.infected(),
            immune: agent.immune(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    parameters: Parameters,
    grid: Grid,
    agents: Vec<Agent>,
    random: RandomSource,
    activation_order: ActivationOrder,
    // Reused across ticks to avoid reallocating.
    schedule: Vec<AgentId>,
    current_tick: usize,
    metrics: MetricsSeries,
}

impl Simulation {
    /// Builds a population of `parameters.population` agents. Each agent draws, in order, its
    /// mask, its infection, an initial recovery countdown uniform in `[1, infection_period]` if
    /// infected (so the initial cohort does not recover all at once), and a uniformly random
    /// cell.
    ///
    /// # Errors
    ///
    /// `SimError::ConfigurationError` if the parameters are invalid.
    #[allow(clippy::cast_possible_wrap)]
    pub fn new(parameters: Parameters, seed: u64) -> Result<Self, SimError> {
        parameters.validate()?;
        let mut random = RandomSource::new(seed);
        let initial_agents = (0..parameters.population)
            .map(|_| {
                let masked = random.sample_bool(parameters.perc_masked);
                let infected = random.sample_bool(parameters.init_infected);
                let recovery_countdown: u32 = if infected {
                    random.sample_range(1..=parameters.infection_period)
                } else {
                    0
                };
                let x: usize = random.sample_range(0..parameters.width);
                let y: usize = random.sample_range(0..parameters.height);
                InitialAgent {
                    masked,
                    infected,
                    recovery_countdown,
                    position: Some((x as i64, y as i64)),
                }
            })
            .collect();
        Self::build(parameters, random, initial_agents)
    }

    /// Builds a simulation from explicit agents, e.g. to force an infection or to put agents in
    /// the same cell. Agents without a position are placed in a uniformly random cell, drawn in
    /// id order.
    ///
    /// # Errors
    ///
    /// `SimError::ConfigurationError` if the parameters are invalid or the number of agents is
    /// not `parameters.population`; `SimError::OutOfBoundsPlacement` for a position off the
    /// grid.
    #[allow(clippy::cast_possible_wrap)]
    pub fn with_agents(
        parameters: Parameters,
        seed: u64,
        initial_agents: Vec<InitialAgent>,
    ) -> Result<Self, SimError> {
        parameters.validate()?;
        if initial_agents.len() != parameters.population {
            return Err(SimError::ConfigurationError(format!(
                "expected {} agents, got {}",
                parameters.population,
                initial_agents.len()
            )));
        }
        let mut random = RandomSource::new(seed);
        let initial_agents = initial_agents
            .into_iter()
            .map(|mut initial| {
                if initial.position.is_none() {
                    let x: usize = random.sample_range(0..parameters.width);
                    let y: usize = random.sample_range(0..parameters.height);
                    initial.position = Some((x as i64, y as i64));
                }
                initial
            })
            .collect();
        Self::build(parameters, random, initial_agents)
    }

    fn build(
        parameters: Parameters,
        random: RandomSource,
        initial_agents: Vec<InitialAgent>,
    ) -> Result<Self, SimError> {
        parameters.warn_outside_suggested_bounds();
        let mut grid = Grid::new(parameters.width, parameters.height)?;
        let mut agents = Vec::with_capacity(initial_agents.len());
        for (index, initial) in initial_agents.into_iter().enumerate() {
            let id = AgentId(index);
            let (x, y) = initial.position.unwrap_or_default();
            let position = grid.place(id, x, y)?;
            let recovery_countdown = match initial.recovery_countdown {
                0 => parameters.infection_period,
                countdown => countdown,
            };
            agents.push(Agent::new(
                id,
                position,
                initial.masked,
                initial.infected,
                recovery_countdown,
            ));
        }

        let mut simulation = Simulation {
            schedule: (0..agents.len()).map(AgentId).collect(),
            parameters,
            grid,
            agents,
            random,
            activation_order: ActivationOrder::default(),
            current_tick: 0,
            metrics: MetricsSeries::new(),
        };
        let counts = simulation.counts();
        info!(
            "simulation of {} agents on a {}x{} grid (seed {}): {:?}",
            simulation.agents.len(),
            simulation.grid.width(),
            simulation.grid.height(),
            simulation.random.seed(),
            counts.as_tuple()
        );
        simulation.metrics.record(0, counts);
        Ok(simulation)
    }

    pub fn set_activation_order(&mut self, activation_order: ActivationOrder) {
        self.activation_order = activation_order;
    }

    pub fn activation_order(&self) -> ActivationOrder {
        self.activation_order
    }

    /// Advances the simulation by one tick and records the resulting counts.
    pub fn tick(&mut self) -> Counts {
        match self.activation_order {
            ActivationOrder::Shuffled => self.random.shuffle(&mut self.schedule),
            ActivationOrder::Sequential => self.schedule.sort_unstable(),
        }
        for &agent_id in &self.schedule {
            step_agent(
                agent_id,
                &mut self.agents,
                &mut self.grid,
                &self.parameters,
                &mut self.random,
            );
        }
        self.current_tick += 1;

        let counts = self.counts();
        debug_assert_eq!(counts.total(), self.parameters.population);
        debug!("tick {}: {:?}", self.current_tick, counts.as_tuple());
        self.metrics.record(self.current_tick, counts);
        counts
    }

    /// Advances the simulation by `ticks` ticks.
    pub fn run(&mut self, ticks: usize) -> Counts {
        for _ in 0..ticks {
            self.tick();
        }
        self.counts()
    }

    /// Current `(susceptible, infected, immune)` counts, from a full scan of the agents.
    pub fn counts(&self) -> Counts {
        Counts::from_agents(&self.agents)
    }

    /// Every agent, in id order.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(AgentSnapshot::from).collect()
    }

    pub fn state_of(&self, agent_id: AgentId) -> Option<EpidemicState> {
        self.agents.get(agent_id.index()).map(Agent::state)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn metrics(&self) -> &MetricsSeries {
        &self.metrics
    }

    /// Number of ticks run so far.
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }
}
