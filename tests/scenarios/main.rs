//! Scenario-based tests for prompt-chain


mod config_driven;
mod observer;
mod template_substitution;
