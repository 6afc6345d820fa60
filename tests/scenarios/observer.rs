//! Test: Observer - snapshots arrive in order and while generation is in flight

use crate::helpers::*;
use async_trait::async_trait;
use prompt_chain::core::{RunStatus, StepStatus};
use prompt_chain::execution::{ChainEvent, ChainExecutor};
use prompt_chain::generation::{GenerationError, GenerationResponse, TextGenerator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Generator that blocks until the test releases it
struct GatedGenerator {
    gate: Arc<Notify>,
    finished: Arc<AtomicBool>,
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse, GenerationError> {
        self.gate.notified().await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(GenerationResponse::new(format!("done: {}", prompt)))
    }
}

#[tokio::test]
async fn test_snapshot_ordering_success() {
    let result = run_chain_with_mock(
        "Hello",
        &numbered_steps(3),
        vec![text("a"), text("b"), text("c")],
    )
    .await;

    // start + 2 per step + finish
    assert_eq!(result.events.len(), 8);
    assert_snapshot_ordering(&result.events);

    for id in 1..=3 {
        assert_eq!(
            status_history(&result.events, id),
            vec![StepStatus::Pending, StepStatus::Processing, StepStatus::Completed]
        );
    }
}

#[tokio::test]
async fn test_snapshot_ordering_failure() {
    let result = run_chain_with_mock(
        "Hello",
        &numbered_steps(3),
        vec![text("a"), fail("quota exceeded")],
    )
    .await;

    assert_snapshot_ordering(&result.events);
    assert_eq!(
        status_history(&result.events, 2),
        vec![StepStatus::Pending, StepStatus::Processing, StepStatus::Error]
    );
    assert_eq!(status_history(&result.events, 3), vec![StepStatus::Pending]);
}

#[tokio::test]
async fn test_initial_snapshot_is_all_pending() {
    let result = run_chain_with_mock("Hello", &numbered_steps(2), vec![text("a"), text("b")]).await;

    match &result.events[0] {
        ChainEvent::RunStarted(snapshot) => {
            assert_eq!(snapshot.status, RunStatus::Running);
            assert!(snapshot
                .steps
                .iter()
                .all(|s| s.status == StepStatus::Pending && s.input.is_empty() && s.output.is_empty()));
        }
        other => panic!("expected RunStarted, got {:?}", other),
    }

    match result.events.last().unwrap() {
        ChainEvent::RunFinished(snapshot) => {
            assert_eq!(snapshot.status, RunStatus::Completed);
            assert_eq!(snapshot.steps, result.run.steps);
        }
        other => panic!("expected RunFinished, got {:?}", other),
    }
}

/// The processing snapshot carries the input before the service answers
#[tokio::test]
async fn test_processing_snapshot_has_input() {
    let result = run_chain_with_mock("Hello", &numbered_steps(1), vec![text("Hi")]).await;

    match &result.events[1] {
        ChainEvent::StepUpdated { step_id, snapshot } => {
            assert_eq!(*step_id, 1);
            let step = snapshot.step(1).unwrap();
            assert_eq!(step.status, StepStatus::Processing);
            assert_eq!(step.input, "Hello");
            assert!(step.output.is_empty());
        }
        other => panic!("expected StepUpdated, got {:?}", other),
    }
}

/// An observer on a channel sees `processing` while the generator is still suspended
#[tokio::test]
async fn test_observer_runs_during_generation() {
    let gate = Arc::new(Notify::new());
    let finished = Arc::new(AtomicBool::new(false));
    let mut executor = ChainExecutor::new(GatedGenerator {
        gate: gate.clone(),
        finished: finished.clone(),
    });
    let mut rx = executor.subscribe();

    let handle = tokio::spawn(async move {
        executor
            .execute("Hello", &numbered_steps(1))
            .await
            .unwrap()
    });

    let started = rx.recv().await.unwrap();
    assert!(matches!(started, ChainEvent::RunStarted(_)));

    let processing = rx.recv().await.unwrap();
    assert_eq!(
        processing.snapshot().step(1).unwrap().status,
        StepStatus::Processing
    );
    assert!(!finished.load(Ordering::SeqCst));

    // Nothing else arrives until the generator is released
    let pending = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(pending.is_err());

    gate.notify_one();

    let completed = rx.recv().await.unwrap();
    let step = completed.snapshot().step(1).unwrap().clone();
    assert_eq!(step.status, StepStatus::Completed);
    assert_eq!(step.output, "done: 1: Hello");

    let run = handle.await.unwrap();
    assert_eq!(run.status, RunStatus::Completed);

    let finished_event = rx.recv().await.unwrap();
    assert!(matches!(finished_event, ChainEvent::RunFinished(_)));
    assert!(rx.recv().await.is_none());
}

/// Slow generations never overlap
#[tokio::test]
async fn test_slow_generator_stays_sequential() {
    let generator = MockGenerator::new(vec![text("a"), text("b"), text("c")])
        .with_delay(Duration::from_millis(10));
    let result = run_chain_with_generator("Hello", &numbered_steps(3), generator).await;

    assert_run_completed(&result);
    assert_snapshot_ordering(&result.events);
    assert_eq!(result.generator.prompts(), vec!["1: Hello", "2: a", "3: b"]);
}
