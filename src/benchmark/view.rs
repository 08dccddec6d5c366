//! Per-kind test view state machine
//!
//! ```text
//! Idle ──start──▶ Running ──completed──▶ Finished
//!   ▲                │                      │
//!   └────cancel──────┘          start ──────┘ (back to Running)
//! ```
//!
//! The view owns its run state. Runner events for any run other than the one
//! currently in flight are ignored, which is how a cancelled run is kept from
//! reaching the store.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, error, info};

use super::runner::{RunHandle, RunId, RunScheduler, RunnerEvent};
use super::TestKind;
use crate::hardware::{EnvironmentInfo, ResourceDescription};
use crate::storage::{RecordId, ResultStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Snapshot of the most recent finished run, used for export and compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedRun {
    pub kind: TestKind,
    pub score: i64,
    pub elapsed_secs: u64,
    pub completed_at: NaiveDateTime,
    /// `None` when the store rejected the append
    pub record_id: Option<RecordId>,
}

pub struct TestView {
    kind: TestKind,
    description: ResourceDescription,
    phase: Phase,
    elapsed: u64,
    last_result: Option<i64>,
    last_run: Option<CompletedRun>,
    active: Option<RunHandle>,
    duration: Duration,
}

impl TestView {
    /// The resource description is read once here and never refreshed.
    pub fn new(kind: TestKind, env: &dyn EnvironmentInfo) -> Self {
        Self {
            kind,
            description: env.describe(kind),
            phase: Phase::Idle,
            elapsed: 0,
            last_result: None,
            last_run: None,
            active: None,
            duration: Duration::ZERO,
        }
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn description(&self) -> &ResourceDescription {
        &self.description
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn last_result(&self) -> Option<i64> {
        self.last_result
    }

    /// The finished run, only while the view is Finished.
    pub fn last_run(&self) -> Option<&CompletedRun> {
        self.last_run.as_ref().filter(|_| self.phase == Phase::Finished)
    }

    pub fn active_run_id(&self) -> Option<RunId> {
        self.active.as_ref().map(RunHandle::run_id)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn can_start(&self) -> bool {
        !self.is_running()
    }

    /// Back navigation is disabled for the whole Running duration.
    pub fn can_go_back(&self) -> bool {
        !self.is_running()
    }

    /// Whole seconds left on the countdown while Running.
    pub fn remaining(&self) -> u64 {
        self.duration.as_secs().saturating_sub(self.elapsed)
    }

    pub fn total_secs(&self) -> u64 {
        self.duration.as_secs()
    }

    /// Start a run. Returns `false` (and does nothing) while one is in flight.
    pub fn start(&mut self, scheduler: &RunScheduler) -> bool {
        if self.is_running() {
            debug!(kind = %self.kind, "Start ignored, run already in flight");
            return false;
        }

        self.phase = Phase::Running;
        self.elapsed = 0;
        self.last_result = None;
        self.last_run = None;
        self.duration = scheduler.settings().duration;

        let handle = scheduler.schedule(self.kind);
        info!(kind = %self.kind, run_id = handle.run_id(), "Test started");
        self.active = Some(handle);
        true
    }

    /// Abort the in-flight run. Nothing is stored for it.
    pub fn cancel(&mut self) -> bool {
        let Some(handle) = self.active.take() else {
            return false;
        };
        handle.cancel();
        info!(kind = %self.kind, run_id = handle.run_id(), "Test cancelled");

        self.phase = Phase::Idle;
        self.elapsed = 0;
        true
    }

    /// Apply a runner event.
    ///
    /// On completion the record is appended exactly once. A store failure still
    /// leaves the view Finished with the score shown; the error is returned so
    /// the caller can report it.
    pub fn on_event(
        &mut self,
        event: RunnerEvent,
        store: &ResultStore,
    ) -> Result<Option<RecordId>, StoreError> {
        if self.active_run_id() != Some(event.run_id()) || event.kind() != self.kind {
            debug!(kind = %self.kind, run_id = event.run_id(), "Ignoring event for stale run");
            return Ok(None);
        }

        match event {
            RunnerEvent::Tick { elapsed, .. } => {
                self.elapsed = elapsed;
                Ok(None)
            }
            RunnerEvent::Completed { elapsed, score, .. } => {
                self.active = None;
                self.phase = Phase::Finished;
                self.elapsed = elapsed.as_secs();
                self.last_result = Some(score);

                let stored = store.append(self.kind, score);
                let record_id = stored.as_ref().ok().copied();
                self.last_run = Some(CompletedRun {
                    kind: self.kind,
                    score,
                    elapsed_secs: self.elapsed,
                    completed_at: Local::now().naive_local(),
                    record_id,
                });

                match stored {
                    Ok(id) => {
                        info!(kind = %self.kind, score, %id, "Test finished");
                        Ok(Some(id))
                    }
                    Err(err) => {
                        error!(kind = %self.kind, score, error = %err, "Failed to store result");
                        Err(err)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::runner::RunSettings;
    use crate::benchmark::score::ScoreModel;
    use crate::hardware::UnavailableProvider;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn scheduler(duration_secs: u64) -> (RunScheduler, UnboundedReceiver<RunnerEvent>) {
        RunScheduler::new(
            RunSettings {
                duration: Duration::from_secs(duration_secs),
                tick: Duration::from_secs(1),
            },
            ScoreModel::default(),
        )
    }

    async fn pump_until_finished(
        view: &mut TestView,
        rx: &mut UnboundedReceiver<RunnerEvent>,
        store: &ResultStore,
    ) {
        while view.phase() == Phase::Running {
            let event = rx.recv().await.expect("runner channel closed");
            view.on_event(event, store).unwrap();
        }
    }

    #[test]
    fn test_new_view_is_idle() {
        let view = TestView::new(TestKind::Ram, &UnavailableProvider);
        assert_eq!(view.phase(), Phase::Idle);
        assert_eq!(view.elapsed(), 0);
        assert_eq!(view.last_result(), None);
        assert!(view.can_start());
        assert!(view.can_go_back());
        assert_eq!(view.description(), &ResourceDescription::unknown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_finishes_once_and_appends_once() {
        let store = ResultStore::open_in_memory().unwrap();
        let (scheduler, mut rx) = scheduler(20);
        let mut view = TestView::new(TestKind::Cpu, &UnavailableProvider);

        assert!(view.start(&scheduler));
        assert_eq!(view.phase(), Phase::Running);
        assert!(!view.can_start());
        assert!(!view.can_go_back());
        assert_eq!(view.remaining(), 20);

        pump_until_finished(&mut view, &mut rx, &store).await;

        assert_eq!(view.phase(), Phase::Finished);
        assert_eq!(view.elapsed(), 20);
        assert!(view.can_start());
        assert!(view.can_go_back());

        let score = view.last_result().expect("score shown");
        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, TestKind::Cpu);
        assert_eq!(records[0].score, score);

        let run = view.last_run().unwrap();
        assert_eq!(run.record_id, Some(records[0].id));
        assert_eq!(run.elapsed_secs, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_a_no_op() {
        let store = ResultStore::open_in_memory().unwrap();
        let (scheduler, mut rx) = scheduler(10);
        let mut view = TestView::new(TestKind::Disk, &UnavailableProvider);

        assert!(view.start(&scheduler));
        let first_run = view.active_run_id();

        // Let a few ticks through, then press Start again.
        for _ in 0..3 {
            let event = rx.recv().await.unwrap();
            view.on_event(event, &store).unwrap();
        }
        assert_eq!(view.elapsed(), 3);
        assert!(!view.start(&scheduler));
        assert_eq!(view.phase(), Phase::Running);
        assert_eq!(view.active_run_id(), first_run);

        let event = rx.recv().await.unwrap();
        view.on_event(event, &store).unwrap();
        assert_eq!(view.elapsed(), 4);

        pump_until_finished(&mut view, &mut rx, &store).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err(), "no second completion scheduled");
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_clears_previous_result() {
        let store = ResultStore::open_in_memory().unwrap();
        let (scheduler, mut rx) = scheduler(2);
        let mut view = TestView::new(TestKind::Ram, &UnavailableProvider);

        view.start(&scheduler);
        pump_until_finished(&mut view, &mut rx, &store).await;
        assert!(view.last_result().is_some());

        assert!(view.start(&scheduler));
        assert_eq!(view.last_result(), None);
        assert!(view.last_run().is_none());
        assert_eq!(view.elapsed(), 0);
        assert_eq!(view.phase(), Phase::Running);

        pump_until_finished(&mut view, &mut rx, &store).await;
        assert!(view.last_result().is_some());
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_append() {
        let store = ResultStore::open_in_memory().unwrap();
        let (scheduler, mut rx) = scheduler(5);
        let mut view = TestView::new(TestKind::Cpu, &UnavailableProvider);

        view.start(&scheduler);
        let event = rx.recv().await.unwrap();
        view.on_event(event, &store).unwrap();

        assert!(view.cancel());
        assert_eq!(view.phase(), Phase::Idle);
        assert!(view.can_go_back());
        assert!(!view.cancel());

        tokio::time::sleep(Duration::from_secs(30)).await;
        while let Ok(event) = rx.try_recv() {
            view.on_event(event, &store).unwrap();
        }
        assert_eq!(view.phase(), Phase::Idle);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_from_stale_runs_are_ignored() {
        let store = ResultStore::open_in_memory().unwrap();
        let (scheduler, _rx) = scheduler(5);
        let mut view = TestView::new(TestKind::Cpu, &UnavailableProvider);

        view.start(&scheduler);
        let stale = view.active_run_id().unwrap();
        view.cancel();
        view.start(&scheduler);

        let outcome = view
            .on_event(
                RunnerEvent::Completed {
                    run_id: stale,
                    kind: TestKind::Cpu,
                    elapsed: Duration::from_secs(5),
                    score: 1,
                },
                &store,
            )
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(view.phase(), Phase::Running);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_still_finishes_view() {
        let store = ResultStore::open_in_memory().unwrap();
        store
            .conn_for_tests()
            .execute_batch("DROP TABLE test_results;")
            .unwrap();
        let (scheduler, _rx) = scheduler(5);
        let mut view = TestView::new(TestKind::Disk, &UnavailableProvider);

        view.start(&scheduler);
        let run_id = view.active_run_id().unwrap();
        let result = view.on_event(
            RunnerEvent::Completed {
                run_id,
                kind: TestKind::Disk,
                elapsed: Duration::from_secs(5),
                score: 4444,
            },
            &store,
        );

        assert!(result.is_err());
        assert_eq!(view.phase(), Phase::Finished);
        assert_eq!(view.last_result(), Some(4444));
        assert_eq!(view.last_run().unwrap().record_id, None);
    }
}
