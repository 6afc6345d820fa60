//! Core domain models for prompt chains
//!
//! This module defines the steps, runs and snapshots a chain execution
//! works on, plus template substitution and chain configuration.

pub mod config;
pub mod state;
pub mod step;
pub mod template;

pub use state::*;
pub use step::*;
pub use template::{placeholder_count, substitute, PLACEHOLDER};
