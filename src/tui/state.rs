//! TUI application state types.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};

use crate::benchmark::runner::{RunScheduler, RunnerEvent};
use crate::benchmark::view::{Phase, TestView};
use crate::benchmark::TestKind;
use crate::dialogs::{self, Comparison};
use crate::export;
use crate::hardware::EnvironmentInfo;
use crate::storage::ResultStore;

/// Which page the shell is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    MainMenu,
    Test(TestKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuChoice {
    Test(TestKind),
    History,
    Recommendations,
    Quit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Test(TestKind::Cpu),
        MenuChoice::Test(TestKind::Ram),
        MenuChoice::Test(TestKind::Disk),
        MenuChoice::History,
        MenuChoice::Recommendations,
        MenuChoice::Quit,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[if idx == 0 { Self::ALL.len() - 1 } else { idx - 1 }]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModalKind {
    History,
    Recommendations,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub(crate) struct ModalState {
    pub kind: ModalKind,
    pub title: String,
    pub lines: Vec<String>,
    pub scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiExit {
    Quit,
}

pub(crate) struct AnimationState {
    pub tick: u64,
}

impl AnimationState {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        FRAMES[(self.tick as usize / 6) % FRAMES.len()]
    }
}

pub(crate) struct App {
    pub view: View,
    pub menu_choice: MenuChoice,
    pub views: [TestView; 3],
    pub modal: Option<ModalState>,
    pub store: ResultStore,
    pub scheduler: RunScheduler,
    pub export_dir: PathBuf,
    pub exit: Option<TuiExit>,
    pub last_tick: Instant,
    pub animation: AnimationState,
}

fn kind_index(kind: TestKind) -> usize {
    match kind {
        TestKind::Cpu => 0,
        TestKind::Ram => 1,
        TestKind::Disk => 2,
    }
}

impl App {
    pub fn new(
        store: ResultStore,
        scheduler: RunScheduler,
        env: &dyn EnvironmentInfo,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            view: View::MainMenu,
            menu_choice: MenuChoice::Test(TestKind::Cpu),
            views: TestKind::ALL.map(|kind| TestView::new(kind, env)),
            modal: None,
            store,
            scheduler,
            export_dir,
            exit: None,
            last_tick: Instant::now(),
            animation: AnimationState::new(),
        }
    }

    pub fn test_view(&self, kind: TestKind) -> &TestView {
        &self.views[kind_index(kind)]
    }

    pub fn test_view_mut(&mut self, kind: TestKind) -> &mut TestView {
        &mut self.views[kind_index(kind)]
    }

    /// The Test View currently on screen, if any.
    pub fn current_test(&self) -> Option<&TestView> {
        match self.view {
            View::Test(kind) => Some(self.test_view(kind)),
            View::MainMenu => None,
        }
    }

    pub fn any_running(&self) -> bool {
        self.views.iter().any(TestView::is_running)
    }

    /// Switch pages. Leaving a Test View while its run is in flight is refused.
    pub fn select_view(&mut self, view: View) -> bool {
        if let View::Test(kind) = self.view {
            if view != self.view && !self.test_view(kind).can_go_back() {
                return false;
            }
        }
        self.view = view;
        true
    }

    pub fn start_current(&mut self) -> bool {
        let View::Test(kind) = self.view else {
            return false;
        };
        let idx = kind_index(kind);
        self.views[idx].start(&self.scheduler)
    }

    pub fn cancel_current(&mut self) -> bool {
        match self.view {
            View::Test(kind) => self.test_view_mut(kind).cancel(),
            View::MainMenu => false,
        }
    }

    pub fn handle_runner_event(&mut self, event: RunnerEvent) {
        let kind = event.kind();
        let idx = kind_index(kind);
        if let Err(err) = self.views[idx].on_event(event, &self.store) {
            self.set_error(
                "Could not save result",
                format!("The {kind} result is shown but was not saved to history.\n\n{err}"),
            );
        }
    }

    /// Returns `true` when the app should exit.
    pub fn request_quit(&mut self) -> bool {
        if self.any_running() {
            self.set_info(
                "Test in progress",
                "A test is still running. Wait for it to finish or press X to cancel it.",
            );
            return false;
        }
        self.exit = Some(TuiExit::Quit);
        true
    }

    pub fn open_history(&mut self) {
        match self.store.list_all() {
            Ok(records) => {
                self.modal = Some(ModalState {
                    kind: ModalKind::History,
                    title: "Test History".to_string(),
                    lines: dialogs::history_lines(&records),
                    scroll: 0,
                });
            }
            Err(err) => {
                warn!(error = %err, "Failed to load history");
                self.set_error("Could not load history", err.to_string());
            }
        }
    }

    pub fn open_recommendations(&mut self) {
        self.modal = Some(ModalState {
            kind: ModalKind::Recommendations,
            title: "Recommendations".to_string(),
            lines: dialogs::RECOMMENDATIONS
                .iter()
                .map(|l| l.to_string())
                .collect(),
            scroll: 0,
        });
    }

    pub fn export_current(&mut self) {
        let Some(run) = self.current_test().and_then(|v| v.last_run()).cloned() else {
            return;
        };
        let path = export::default_report_path(&self.export_dir, &run);
        match export::write_report(&path, &run) {
            Ok(()) => self.set_info("Report exported", format!("Saved to:\n{}", path.display())),
            Err(err) => self.set_error("Export failed", format!("{err:#}")),
        }
    }

    pub fn compare_current(&mut self) {
        let Some(run) = self.current_test().and_then(|v| v.last_run()).cloned() else {
            return;
        };
        match self.store.list_all() {
            Ok(records) => {
                let cmp = Comparison::for_run(&run, &records);
                self.set_info(format!("Compare {}", run.kind), cmp.lines().join("\n"));
            }
            Err(err) => self.set_error("Could not load history", err.to_string()),
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn set_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.set_modal(ModalKind::Error, title.into(), message.into());
    }

    pub fn set_info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.set_modal(ModalKind::Info, title.into(), message.into());
    }

    fn set_modal(&mut self, kind: ModalKind, title: String, message: String) {
        info!(title = %title, "Showing message");
        self.modal = Some(ModalState {
            kind,
            title,
            lines: message.lines().map(str::to_string).collect(),
            scroll: 0,
        });
    }

    pub fn close_store(self) -> anyhow::Result<()> {
        self.store.close()?;
        Ok(())
    }
}

/// `MM:SS`, as shown on the countdown.
pub(crate) fn format_stopwatch(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub(crate) fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "READY",
        Phase::Running => "RUNNING",
        Phase::Finished => "FINISHED",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::benchmark::runner::RunSettings;
    use crate::benchmark::score::ScoreModel;
    use crate::hardware::UnavailableProvider;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc::UnboundedReceiver;

    pub(crate) fn test_app(export_dir: PathBuf) -> (App, UnboundedReceiver<RunnerEvent>) {
        let (scheduler, rx) = RunScheduler::new(
            RunSettings {
                duration: Duration::from_secs(3),
                tick: Duration::from_secs(1),
            },
            ScoreModel::default(),
        );
        let store = ResultStore::open_in_memory().unwrap();
        (
            App::new(store, scheduler, &UnavailableProvider, export_dir),
            rx,
        )
    }

    async fn finish_run(app: &mut App, rx: &mut UnboundedReceiver<RunnerEvent>) {
        while app.any_running() {
            let event = rx.recv().await.unwrap();
            app.handle_runner_event(event);
        }
    }

    #[test]
    fn test_stopwatch_format() {
        assert_eq!(format_stopwatch(0), "00:00");
        assert_eq!(format_stopwatch(9), "00:09");
        assert_eq!(format_stopwatch(75), "01:15");
    }

    #[test]
    fn test_menu_choice_wraps() {
        assert_eq!(MenuChoice::Quit.next(), MenuChoice::Test(TestKind::Cpu));
        assert_eq!(MenuChoice::Test(TestKind::Cpu).prev(), MenuChoice::Quit);
    }

    #[test]
    fn test_select_view_is_unconditional_when_idle() {
        let (mut app, _rx) = test_app(PathBuf::from("."));
        assert!(app.select_view(View::Test(TestKind::Ram)));
        assert!(app.select_view(View::Test(TestKind::Disk)));
        assert!(app.select_view(View::MainMenu));
        assert_eq!(app.view, View::MainMenu);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cannot_leave_running_view() {
        let (mut app, mut rx) = test_app(PathBuf::from("."));
        app.select_view(View::Test(TestKind::Cpu));
        assert!(app.start_current());

        assert!(!app.select_view(View::MainMenu));
        assert_eq!(app.view, View::Test(TestKind::Cpu));
        assert!(!app.request_quit());
        assert_eq!(app.modal.as_ref().map(|m| m.kind), Some(ModalKind::Info));
        app.close_modal();

        finish_run(&mut app, &mut rx).await;
        assert!(app.select_view(View::MainMenu));
        assert!(app.request_quit());
        assert_eq!(app.exit, Some(TuiExit::Quit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_dialog_reads_store() {
        let (mut app, mut rx) = test_app(PathBuf::from("."));
        app.open_history();
        assert_eq!(
            app.modal.as_ref().unwrap().lines,
            vec![dialogs::EMPTY_HISTORY.to_string()]
        );

        app.select_view(View::Test(TestKind::Disk));
        app.start_current();
        finish_run(&mut app, &mut rx).await;

        app.open_history();
        let modal = app.modal.as_ref().unwrap();
        assert_eq!(modal.kind, ModalKind::History);
        assert_eq!(modal.lines.len(), 1);
        assert!(modal.lines[0].starts_with("DISK | Result: "));
    }

    #[test]
    fn test_recommendations_are_static() {
        let (mut app, _rx) = test_app(PathBuf::from("."));
        app.open_recommendations();
        let modal = app.modal.as_ref().unwrap();
        assert_eq!(modal.kind, ModalKind::Recommendations);
        assert_eq!(modal.lines[0], "General Recommendations:");
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_and_compare_after_finish() {
        let temp_dir = TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(temp_dir.path().to_path_buf());
        app.select_view(View::Test(TestKind::Ram));

        // Nothing to export before a run has finished.
        app.export_current();
        assert!(app.modal.is_none());

        app.start_current();
        finish_run(&mut app, &mut rx).await;

        app.export_current();
        assert_eq!(app.modal.as_ref().unwrap().title, "Report exported");
        let exported: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(exported.len(), 1);

        app.compare_current();
        let modal = app.modal.as_ref().unwrap();
        assert_eq!(modal.title, "Compare RAM");
        assert!(modal.lines.iter().any(|l| l == "Previous run: none"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_and_compare_unavailable_after_restart() {
        let temp_dir = TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(temp_dir.path().to_path_buf());
        app.select_view(View::Test(TestKind::Cpu));
        app.start_current();
        finish_run(&mut app, &mut rx).await;
        assert!(app.test_view(TestKind::Cpu).last_run().is_some());

        // A new run in flight hides the previous result.
        assert!(app.start_current());
        assert!(app.test_view(TestKind::Cpu).last_run().is_none());
        app.export_current();
        app.compare_current();
        assert!(app.modal.is_none());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);

        // Cancelling back to Idle does not bring it back.
        assert!(app.cancel_current());
        app.export_current();
        app.compare_current();
        assert!(app.modal.is_none());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_shows_error_modal() {
        let (mut app, mut rx) = test_app(PathBuf::from("."));
        app.store
            .conn_for_tests()
            .execute_batch("DROP TABLE test_results;")
            .unwrap();

        app.select_view(View::Test(TestKind::Cpu));
        app.start_current();
        finish_run(&mut app, &mut rx).await;

        let modal = app.modal.as_ref().unwrap();
        assert_eq!(modal.kind, ModalKind::Error);
        assert!(app.test_view(TestKind::Cpu).last_result().is_some());
    }
}
