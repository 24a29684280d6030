use std::fmt::{self, Display};
use std::io;

use crate::agent::AgentId;

/// Provides `SimError` and maps to other errors to
/// convert to a `SimError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SimError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    /// Out-of-range or non-positive simulation parameters.
    ConfigurationError(String),
    /// An explicit placement outside the lattice. Moves clamp and never produce this.
    OutOfBoundsPlacement {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    AgentNotPlaced(AgentId),
}

impl From<io::Error> for SimError {
    fn from(error: io::Error) -> Self {
        SimError::IoError(error)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(error: serde_json::Error) -> Self {
        SimError::JsonError(error)
    }
}

impl From<String> for SimError {
    fn from(error: String) -> Self {
        SimError::ConfigurationError(error)
    }
}

impl From<&str> for SimError {
    fn from(error: &str) -> Self {
        SimError::ConfigurationError(error.to_string())
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::IoError(error) => Some(error),
            SimError::JsonError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::IoError(error) => write!(f, "I/O error: {error}"),
            SimError::JsonError(error) => write!(f, "invalid JSON: {error}"),
            SimError::ConfigurationError(message) => {
                write!(f, "invalid configuration: {message}")
            }
            SimError::OutOfBoundsPlacement {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cannot place an agent at ({x}, {y}) on a {width}x{height} grid"
            ),
            SimError::AgentNotPlaced(agent_id) => {
                write!(f, "{agent_id:?} has not been placed on the grid")
            }
        }
    }
}
