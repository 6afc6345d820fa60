//! Chain execution engine - drives every step of a run in order

use crate::{
    core::{ChainError, ChainRun, ChainSnapshot, StepDefinition},
    execution::{StepExecutor, StepOutcome},
    generation::TextGenerator,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted while a chain runs
///
/// Every variant carries a full snapshot of the run's steps, so observers
/// never need to track state of their own.
#[derive(Debug, Clone)]
pub enum ChainEvent {
    /// Steps were created, all pending
    RunStarted(ChainSnapshot),
    /// A step changed status
    StepUpdated {
        step_id: usize,
        snapshot: ChainSnapshot,
    },
    /// The run completed or halted
    RunFinished(ChainSnapshot),
}

impl ChainEvent {
    /// The snapshot carried by this event
    pub fn snapshot(&self) -> &ChainSnapshot {
        match self {
            ChainEvent::RunStarted(snapshot) | ChainEvent::RunFinished(snapshot) => snapshot,
            ChainEvent::StepUpdated { snapshot, .. } => snapshot,
        }
    }
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ChainEvent) + Send + Sync>;

/// Sequential chain executor
///
/// Runs one generation call at a time and stops at the first failing step.
pub struct ChainExecutor<G> {
    executor: StepExecutor<G>,
    event_handlers: Vec<EventHandler>,
}

impl<G: TextGenerator> ChainExecutor<G> {
    pub fn new(generator: G) -> Self {
        Self {
            executor: StepExecutor::new(generator),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ChainEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Add an event handler (builder style)
    pub fn with_event_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(ChainEvent) + Send + Sync + 'static,
    {
        self.add_event_handler(handler);
        self
    }

    /// Receive every event through an unbounded channel
    ///
    /// The channel closes once the executor is dropped.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ChainEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.add_event_handler(move |event| {
            // A dropped receiver just means nobody is watching anymore
            let _ = tx.send(event);
        });
        rx
    }

    /// Emit an event to all handlers
    fn emit(&self, event: ChainEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the chain against `initial_input`
    ///
    /// Generation failures do not surface as `Err`: they leave the failing
    /// step in `error` with the message as its output and the run `failed`.
    pub async fn execute(
        &self,
        initial_input: &str,
        steps: &[StepDefinition],
    ) -> Result<ChainRun, ChainError> {
        if initial_input.trim().is_empty() {
            return Err(ChainError::EmptyInput);
        }
        if steps.is_empty() {
            return Err(ChainError::NoSteps);
        }

        let mut run = ChainRun::new(initial_input, steps);
        let mut sequence = 0;

        info!("Starting chain run {} ({} steps)", run.run_id, run.steps.len());
        run.start();
        self.emit(ChainEvent::RunStarted(run.snapshot(sequence)));

        let mut carry = initial_input.to_string();

        for index in 0..run.steps.len() {
            let step_id = run.steps[index].id;

            run.steps[index].begin(carry.clone())?;
            sequence += 1;
            self.emit(ChainEvent::StepUpdated {
                step_id,
                snapshot: run.snapshot(sequence),
            });

            let outcome = self.executor.execute(&run.steps[index], &carry).await;

            let halted = match outcome {
                StepOutcome::Completed { output } => {
                    run.steps[index].complete(output.clone())?;
                    carry = output;
                    false
                }
                StepOutcome::Failed { message } => {
                    warn!("Step {} failed, halting run {}: {}", step_id, run.run_id, message);
                    run.steps[index].fail(message)?;
                    true
                }
            };

            sequence += 1;
            self.emit(ChainEvent::StepUpdated {
                step_id,
                snapshot: run.snapshot(sequence),
            });

            if halted {
                break;
            }
        }

        if run.failed_step().is_some() {
            run.fail();
        } else {
            run.complete();
        }

        info!("Chain run {} finished: {:?}", run.run_id, run.status);
        sequence += 1;
        self.emit(ChainEvent::RunFinished(run.snapshot(sequence)));
        Ok(run)
    }
}
