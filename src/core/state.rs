//! Chain run state models

use crate::core::step::{Step, StepDefinition, StepStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the chain executor itself
///
/// Generation failures are not represented here: they end up in the failing
/// step's output instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("initial input is empty")]
    EmptyInput,

    #[error("chain has no steps")]
    NoSteps,

    #[error("step {step_id} cannot move from {from} to {to}")]
    InvalidTransition {
        step_id: usize,
        from: StepStatus,
        to: StepStatus,
    },
}

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Run has not started
    Pending,
    /// A step is being processed
    Running,
    /// Every step completed
    Completed,
    /// A step errored and the run halted
    Failed,
}

/// One execution of a full chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRun {
    /// Unique run ID
    pub run_id: Uuid,

    /// Input handed to the first step
    pub initial_input: String,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Current run status
    pub status: RunStatus,

    /// When execution started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed or halted
    pub finished_at: Option<DateTime<Utc>>,
}

impl ChainRun {
    /// Create a run with every step pending
    pub fn new(initial_input: impl Into<String>, definitions: &[StepDefinition]) -> Self {
        let steps = definitions
            .iter()
            .enumerate()
            .map(|(i, definition)| Step::new(i + 1, definition))
            .collect();

        Self {
            run_id: Uuid::new_v4(),
            initial_input: initial_input.into(),
            steps,
            status: RunStatus::Pending,
            started_at: None,
            finished_at: None,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    /// Mark the run as failed
    pub fn fail(&mut self) {
        self.status = RunStatus::Failed;
        self.finished_at = Some(Utc::now());
    }

    /// Number of steps with the given status
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    /// Output of the last step, once every step has completed
    pub fn final_output(&self) -> Option<&str> {
        if self.status != RunStatus::Completed {
            return None;
        }
        self.steps.last().map(|s| s.output.as_str())
    }

    /// The step that halted the run, if any
    pub fn failed_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.status == StepStatus::Error)
    }

    /// Take an immutable copy of the current state
    pub fn snapshot(&self, sequence: usize) -> ChainSnapshot {
        ChainSnapshot {
            run_id: self.run_id,
            sequence,
            status: self.status,
            steps: self.steps.clone(),
        }
    }
}

/// Immutable view of a run after a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Run this snapshot belongs to
    pub run_id: Uuid,

    /// Position in the run's snapshot sequence, starting at 0
    pub sequence: usize,

    /// Run status at the time of the snapshot
    pub status: RunStatus,

    /// All steps, in execution order
    pub steps: Vec<Step>,
}

impl ChainSnapshot {
    /// Get a step by its 1-based ID
    pub fn step(&self, id: usize) -> Option<&Step> {
        id.checked_sub(1).and_then(|i| self.steps.get(i))
    }
}
