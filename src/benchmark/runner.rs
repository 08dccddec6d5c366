//! Deferred test runner
//!
//! A run is a tokio task that only awaits timers: it emits one `Tick` per tick
//! interval and a single `Completed` once the configured duration has passed.
//! Events go through an unbounded channel to whoever owns the views, so the
//! UI loop never blocks on a run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::score::ScoreModel;
use super::TestKind;

pub type RunId = u64;

/// Timing for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Time until the completion event fires
    pub duration: Duration,
    /// Countdown refresh interval
    pub tick: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(20_000),
            tick: Duration::from_millis(1_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    Tick {
        run_id: RunId,
        kind: TestKind,
        /// Ticks seen so far for this run
        elapsed: u64,
    },
    Completed {
        run_id: RunId,
        kind: TestKind,
        elapsed: Duration,
        score: i64,
    },
}

impl RunnerEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            RunnerEvent::Tick { run_id, .. } | RunnerEvent::Completed { run_id, .. } => *run_id,
        }
    }

    pub fn kind(&self) -> TestKind {
        match self {
            RunnerEvent::Tick { kind, .. } | RunnerEvent::Completed { kind, .. } => *kind,
        }
    }
}

/// Spawns runs onto the current tokio runtime.
pub struct RunScheduler {
    tx: mpsc::UnboundedSender<RunnerEvent>,
    settings: RunSettings,
    scores: ScoreModel,
    next_run_id: AtomicU64,
}

impl RunScheduler {
    pub fn new(
        settings: RunSettings,
        scores: ScoreModel,
    ) -> (Self, mpsc::UnboundedReceiver<RunnerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            settings,
            scores,
            next_run_id: AtomicU64::new(1),
        };
        (scheduler, rx)
    }

    pub fn settings(&self) -> RunSettings {
        self.settings
    }

    /// Schedule a run. Must be called from within a tokio runtime.
    pub fn schedule(&self, kind: TestKind) -> RunHandle {
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let tx = self.tx.clone();
        let settings = self.settings;
        let scores = self.scores.clone();

        debug!(run_id, %kind, duration_ms = settings.duration.as_millis() as u64, "Scheduling run");
        let task = tokio::spawn(drive_run(run_id, kind, settings, scores, tx));

        RunHandle { run_id, task }
    }
}

/// Handle to an in-flight run. Dropping the handle cancels the run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: RunId,
    task: JoinHandle<()>,
}

impl RunHandle {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Stop the run. No further events are sent for it.
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            debug!(run_id = self.run_id, "Cancelling run");
        }
        self.task.abort();
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive_run(
    run_id: RunId,
    kind: TestKind,
    settings: RunSettings,
    scores: ScoreModel,
    tx: mpsc::UnboundedSender<RunnerEvent>,
) {
    let started = Instant::now();
    let deadline = started + settings.duration;

    let mut ticker = tokio::time::interval_at(started + settings.tick, settings.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let completion = tokio::time::sleep_until(deadline);
    tokio::pin!(completion);

    let mut elapsed = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = &mut completion => break,
            _ = ticker.tick() => {
                elapsed += 1;
                trace!(run_id, %kind, elapsed, "Tick");
                if tx.send(RunnerEvent::Tick { run_id, kind, elapsed }).is_err() {
                    // Receiver is gone; nobody is left to display or store the run.
                    return;
                }
            }
        }
    }

    let elapsed = started.elapsed();
    let score = scores.score(kind, elapsed, &mut rand::thread_rng());
    debug!(run_id, %kind, score, "Run completed");
    let _ = tx.send(RunnerEvent::Completed {
        run_id,
        kind,
        elapsed,
        score,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(duration_secs: u64) -> RunSettings {
        RunSettings {
            duration: Duration::from_secs(duration_secs),
            tick: Duration::from_secs(1),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_every_second_then_completes_once() {
        let (scheduler, mut rx) = RunScheduler::new(settings(20), ScoreModel::default());
        let handle = scheduler.schedule(TestKind::Cpu);

        let mut ticks = Vec::new();
        let completed = loop {
            match rx.recv().await.expect("channel open") {
                RunnerEvent::Tick { elapsed, run_id, .. } => {
                    assert_eq!(run_id, handle.run_id());
                    ticks.push(elapsed);
                }
                event @ RunnerEvent::Completed { .. } => break event,
            }
        };

        assert_eq!(ticks, (1..=19).collect::<Vec<_>>());
        match completed {
            RunnerEvent::Completed {
                kind,
                elapsed,
                score,
                ..
            } => {
                assert_eq!(kind, TestKind::Cpu);
                assert_eq!(elapsed, Duration::from_secs(20));
                assert!((5000..=6500).contains(&score));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err(), "no events after completion");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_never_completes() {
        let (scheduler, mut rx) = RunScheduler::new(settings(20), ScoreModel::default());
        let handle = scheduler.schedule(TestKind::Ram);

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let mut saw_tick = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                RunnerEvent::Tick { .. } => saw_tick = true,
                RunnerEvent::Completed { .. } => panic!("cancelled run must not complete"),
            }
        }
        assert!(saw_tick);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_run() {
        let (scheduler, mut rx) = RunScheduler::new(settings(3), ScoreModel::default());
        drop(scheduler.schedule(TestKind::Disk));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ids_are_distinct() {
        let (scheduler, _rx) = RunScheduler::new(settings(3), ScoreModel::default());
        let a = scheduler.schedule(TestKind::Cpu);
        let b = scheduler.schedule(TestKind::Cpu);
        assert_ne!(a.run_id(), b.run_id());
    }
}
