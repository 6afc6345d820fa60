//! Chain execution engine

pub mod engine;
pub mod executor;

pub use engine::{ChainEvent, ChainExecutor, EventHandler};
pub use executor::{StepExecutor, StepOutcome, FALLBACK_ERROR_MESSAGE};
