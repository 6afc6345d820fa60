//! Step domain model

use crate::core::{state::ChainError, template};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not started yet
    Pending,
    /// Waiting on the generation service
    Processing,
    /// Generation succeeded, output holds the text
    Completed,
    /// Generation failed, output holds the error message
    Error,
}

impl StepStatus {
    /// Check if the status is final for this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Error)
    }

    /// Whether moving from `self` to `next` respects the forward-only lifecycle
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        matches!(
            (self, next),
            (StepStatus::Pending, StepStatus::Processing)
                | (StepStatus::Processing, StepStatus::Completed)
                | (StepStatus::Processing, StepStatus::Error)
        )
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepStatus::Pending => "pending",
            StepStatus::Processing => "processing",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// A named prompt template, as supplied by the caller before a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Human-readable step name
    pub name: String,

    /// Prompt template containing the `{input}` placeholder
    pub template: String,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }
}

/// A single step of a chain run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in the chain
    pub id: usize,

    /// Human-readable step name
    pub name: String,

    /// The prompt template for this step
    pub prompt_template: String,

    /// Carry value fed into this step (empty until processing starts)
    pub input: String,

    /// Generated text, or the error message on failure
    pub output: String,

    /// Current lifecycle status
    pub status: StepStatus,
}

impl Step {
    /// Create a fresh pending step
    pub fn new(id: usize, definition: &StepDefinition) -> Self {
        Self {
            id,
            name: definition.name.clone(),
            prompt_template: definition.template.clone(),
            input: String::new(),
            output: String::new(),
            status: StepStatus::Pending,
        }
    }

    /// Render the effective prompt for the given carry value
    pub fn render_prompt(&self, input: &str) -> String {
        template::substitute(&self.prompt_template, input)
    }

    /// Mark the step as processing with its input
    pub fn begin(&mut self, input: String) -> Result<(), ChainError> {
        self.transition(StepStatus::Processing)?;
        self.input = input;
        Ok(())
    }

    /// Mark the step as completed with the generated output
    pub fn complete(&mut self, output: String) -> Result<(), ChainError> {
        self.transition(StepStatus::Completed)?;
        self.output = output;
        Ok(())
    }

    /// Mark the step as failed, storing the user-facing message as output
    pub fn fail(&mut self, message: String) -> Result<(), ChainError> {
        self.transition(StepStatus::Error)?;
        self.output = message;
        Ok(())
    }

    fn transition(&mut self, next: StepStatus) -> Result<(), ChainError> {
        if !self.status.can_transition_to(next) {
            return Err(ChainError::InvalidTransition {
                step_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
