//! prompt-chain - run a fixed chain of LLM prompts, feeding each output into the next step

pub mod cli;
pub mod core;
pub mod execution;
pub mod generation;

// Re-export commonly used types
pub use core::{ChainError, ChainRun, ChainSnapshot, RunStatus, Step, StepDefinition, StepStatus};
pub use execution::{ChainEvent, ChainExecutor, StepOutcome};
pub use generation::{GenerationConfig, GenerationError, GenerationResponse, TextGenerator};
