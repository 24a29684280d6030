//! A fixed-size, edge-clamped lattice in which any number of agents can share a cell.
//!
//! The grid is the owner of agent positions. It keeps both directions of the membership
//! relation (cell to agents and agent to cell) and updates them together, so no query can
//! observe an agent in two cells or in none.
use serde::Serialize;

use crate::agent::AgentId;
use crate::error::SimError;
use crate::hashing::{HashMap, HashSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    // Both at least 1.
    width: usize,
    height: usize,
    // Row-major, `y * width + x`.
    cells: Vec<HashSet<AgentId>>,
    locations: HashMap<AgentId, Position>,
}

impl Grid {
    /// Creates an empty `width` x `height` grid.
    ///
    /// # Errors
    ///
    /// `SimError::ConfigurationError` if either dimension is zero or the number of cells does
    /// not fit in an `i64`.
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::ConfigurationError(format!(
                "a {width}x{height} grid has no cells"
            )));
        }
        let cell_count = width
            .checked_mul(height)
            .filter(|&count| i64::try_from(count).is_ok())
            .ok_or_else(|| {
                SimError::ConfigurationError(format!("a {width}x{height} grid is too large"))
            })?;
        Ok(Grid {
            width,
            height,
            cells: vec![HashSet::default(); cell_count],
            locations: HashMap::default(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y)
    }

    /// Clamps an arbitrary coordinate to the nearest cell of the grid.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn clamp(&self, x: i64, y: i64) -> Position {
        Position {
            x: x.clamp(0, self.width as i64 - 1) as usize,
            y: y.clamp(0, self.height as i64 - 1) as usize,
        }
    }

    fn index(&self, position: Position) -> usize {
        position.y * self.width + position.x
    }

    /// Puts `agent_id` in the cell at `(x, y)`. An agent that is already on the grid is taken
    /// out of its previous cell first.
    ///
    /// # Errors
    ///
    /// `SimError::OutOfBoundsPlacement` if `(x, y)` is not a cell of the grid. Nothing is
    /// changed in that case.
    #[allow(clippy::cast_sign_loss)]
    pub fn place(&mut self, agent_id: AgentId, x: i64, y: i64) -> Result<Position, SimError> {
        if !self.in_bounds(x, y) {
            return Err(SimError::OutOfBoundsPlacement {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let position = Position::new(x as usize, y as usize);
        self.relocate(agent_id, position);
        Ok(position)
    }

    /// Moves a placed agent toward `(new_x, new_y)`, clamped to the grid, and returns where it
    /// ended up.
    ///
    /// # Errors
    ///
    /// `SimError::AgentNotPlaced` if the agent has never been placed.
    pub fn move_agent(
        &mut self,
        agent_id: AgentId,
        new_x: i64,
        new_y: i64,
    ) -> Result<Position, SimError> {
        if self.position(agent_id).is_none() {
            return Err(SimError::AgentNotPlaced(agent_id));
        }
        Ok(self.move_clamped(agent_id, new_x, new_y))
    }

    /// `move_agent` for callers that know the agent is on the grid.
    pub(crate) fn move_clamped(&mut self, agent_id: AgentId, new_x: i64, new_y: i64) -> Position {
        let position = self.clamp(new_x, new_y);
        self.relocate(agent_id, position);
        position
    }

    fn relocate(&mut self, agent_id: AgentId, position: Position) {
        let index = self.index(position);
        if let Some(previous) = self.locations.insert(agent_id, position) {
            if previous == position {
                return;
            }
            let previous_index = self.index(previous);
            self.cells[previous_index].remove(&agent_id);
        }
        self.cells[index].insert(agent_id);
    }

    /// The agents in the cell at `(x, y)`. Coordinates outside the grid hold nobody.
    pub fn contents(&self, x: usize, y: usize) -> impl Iterator<Item = AgentId> + '_ {
        let cell = (x < self.width && y < self.height).then(|| &self.cells[y * self.width + x]);
        cell.into_iter().flat_map(|agents| agents.iter().copied())
    }

    pub fn cell_len(&self, x: usize, y: usize) -> usize {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x].len()
        } else {
            0
        }
    }

    pub fn contains(&self, agent_id: AgentId, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x].contains(&agent_id)
    }

    pub fn position(&self, agent_id: AgentId) -> Option<Position> {
        self.locations.get(&agent_id).copied()
    }

    /// Cells holding at least one agent, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, agents)| !agents.is_empty())
            .map(|(index, agents)| {
                (
                    Position::new(index % self.width, index / self.width),
                    agents.len(),
                )
            })
    }

    /// Number of agents on the grid.
    pub fn placed_count(&self) -> usize {
        self.locations.len()
    }
}
