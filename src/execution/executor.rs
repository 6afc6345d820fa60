//! Step executor - runs a single step against the generation service

use crate::{core::Step, generation::TextGenerator};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info};

/// Message shown when a failure carries no usable text
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Result of executing a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Generation succeeded
    Completed { output: String },
    /// Generation failed; `message` is what the user sees
    Failed { message: String },
}

/// Executes a single step
pub struct StepExecutor<G> {
    generator: G,
}

impl<G: TextGenerator> StepExecutor<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Render the step's prompt with `input` and call the generator
    ///
    /// Never fails: generator errors and panics become `StepOutcome::Failed`.
    pub async fn execute(&self, step: &Step, input: &str) -> StepOutcome {
        info!("Executing step {}: {}", step.id, step.name);

        let prompt = step.render_prompt(input);
        debug!("Effective prompt for step {}: {}", step.id, prompt);

        let result = AssertUnwindSafe(self.generator.generate(&prompt))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(response)) => {
                debug!(
                    "Step {} received {} bytes of output",
                    step.id,
                    response.content.len()
                );
                StepOutcome::Completed {
                    output: response.content,
                }
            }
            Ok(Err(e)) => {
                error!("Generation error for step {}: {}", step.id, e);
                StepOutcome::Failed {
                    message: user_message(e.to_string()),
                }
            }
            Err(panic) => {
                error!("Generator panicked during step {}", step.id);
                StepOutcome::Failed {
                    message: user_message(panic_message(panic.as_ref())),
                }
            }
        }
    }
}

fn user_message(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    }
}
