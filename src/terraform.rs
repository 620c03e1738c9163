pub mod aggregate;
pub mod source;
pub mod state;

pub use aggregate::Aggregator;
pub use source::{CommandStateSource, DEFAULT_STATE_COMMAND, StateSource};
pub use state::{Module, PrimaryState, ResourceState, StateDocument};
