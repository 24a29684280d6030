//! Agents and their epidemic state machine.
//!
//! An agent is a plain record. Its state is one of Susceptible, Infected or Immune, derived from
//! the `infected` and `immune` flags, which are never both set. Once per tick [`step_agent`]
//! runs four rules in a fixed order, each one reading what the previous rules wrote:
//!
//! 1. move one cell (or stay) along each axis, clamped to the grid;
//! 2. a susceptible agent sharing its cell with an infected agent is exposed;
//! 3. the recovery countdown runs and an agent whose countdown reaches its last tick becomes
//!    immune;
//! 4. the immunity countdown runs and an agent whose immunity has run out becomes susceptible.
use log::trace;
use serde::Serialize;

use crate::grid::{Grid, Position};
use crate::parameters::Parameters;
use crate::random::RandomSource;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct AgentId(pub(crate) usize);

impl AgentId {
    pub fn new(index: usize) -> Self {
        AgentId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum EpidemicState {
    Susceptible,
    Infected,
    Immune,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    id: AgentId,
    position: Position,
    masked: bool,
    infected: bool,
    immune: bool,
    recovery_countdown: u32,
    immunity_countdown: u32,
}

impl Agent {
    pub(crate) fn new(
        id: AgentId,
        position: Position,
        masked: bool,
        infected: bool,
        recovery_countdown: u32,
    ) -> Self {
        Agent {
            id,
            position,
            masked,
            infected,
            immune: false,
            recovery_countdown: if infected { recovery_countdown } else { 0 },
            immunity_countdown: 0,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn masked(&self) -> bool {
        self.masked
    }

    pub fn infected(&self) -> bool {
        self.infected
    }

    pub fn immune(&self) -> bool {
        self.immune
    }

    pub fn recovery_countdown(&self) -> u32 {
        self.recovery_countdown
    }

    pub fn immunity_countdown(&self) -> u32 {
        self.immunity_countdown
    }

    pub fn state(&self) -> EpidemicState {
        debug_assert!(!(self.infected && self.immune), "{:?}", self);
        if self.infected {
            EpidemicState::Infected
        } else if self.immune {
            EpidemicState::Immune
        } else {
            EpidemicState::Susceptible
        }
    }

    pub fn is_susceptible(&self) -> bool {
        !self.infected && !self.immune
    }

    fn transmission_probability(&self, parameters: &Parameters) -> f64 {
        if self.masked {
            parameters.prob_trans_masked
        } else {
            parameters.prob_trans_unmasked
        }
    }

    fn infect(&mut self, infection_period: u32) {
        trace!("{:?} infected at {:?}", self.id, self.position);
        self.infected = true;
        self.recovery_countdown = infection_period;
    }

    /// Runs the recovery countdown for one tick.
    fn update_recovered(&mut self, immunity_period: u32) {
        if self.recovery_countdown == 1 {
            trace!("{:?} recovered", self.id);
            self.infected = false;
            self.immune = true;
            self.recovery_countdown = 0;
            self.immunity_countdown = immunity_period;
        } else if self.recovery_countdown > 0 {
            self.recovery_countdown -= 1;
        }
    }

    /// Runs the immunity countdown for one tick.
    fn update_susceptible(&mut self) {
        if self.immunity_countdown == 1 {
            trace!("{:?} lost immunity", self.id);
            self.immune = false;
            self.immunity_countdown = 0;
        } else if self.immunity_countdown > 0 {
            self.immunity_countdown -= 1;
        }
    }
}

/// Advances the agent `agent_id` by one tick. The agent reads the live state of the agents it
/// shares a cell with, so an agent infected earlier in the same tick is already a source.
///
/// # Panics
///
/// If `agent_id`, or an agent on the grid, is not an index into `agents`.
#[allow(clippy::cast_possible_wrap)]
pub fn step_agent(
    agent_id: AgentId,
    agents: &mut [Agent],
    grid: &mut Grid,
    parameters: &Parameters,
    random: &mut RandomSource,
) {
    // Move
    let Position { x, y } = agents[agent_id.index()].position;
    let new_x = x as i64 + random.sample_unit_step();
    let new_y = y as i64 + random.sample_unit_step();
    let position = grid.move_clamped(agent_id, new_x, new_y);
    agents[agent_id.index()].position = position;

    // Exposure
    if agents[agent_id.index()].is_susceptible() {
        let exposed = grid
            .contents(position.x, position.y)
            .any(|other| agents[other.index()].infected);
        if exposed {
            let agent = &mut agents[agent_id.index()];
            if random.sample_bool(agent.transmission_probability(parameters)) {
                agent.infect(parameters.infection_period);
            }
        }
    }

    let agent = &mut agents[agent_id.index()];
    agent.update_recovered(parameters.immunity_period);
    agent.update_susceptible();
}
