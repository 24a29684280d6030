pub use crate::agent::{Agent, AgentId, EpidemicState};
pub use crate::error::SimError;
pub use crate::grid::{Grid, Position};
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::metrics::{Counts, MetricsRecord, MetricsSeries};
pub use crate::parameters::{Parameters, ParametersBuilder};
pub use crate::simulation::{ActivationOrder, AgentSnapshot, InitialAgent, Simulation};
