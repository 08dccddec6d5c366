//! Fullscreen terminal UI (TUI).
//!
//! Runs on the same current-thread runtime as the test runner. Each frame
//! drains runner events, handles at most one key, then yields until the next
//! event or frame deadline so scheduled runs keep ticking.

pub(crate) mod input;
pub(crate) mod screens;
pub(crate) mod state;
pub(crate) mod theme;
pub(crate) mod widgets;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Terminal;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::benchmark::runner::RunnerEvent;
use state::*;
use theme::Theme;

const FRAME_TIME: Duration = Duration::from_millis(16);

pub(crate) use state::{App, TuiExit};

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the shell until the user quits. Returns the app so the caller can
/// close the store after the terminal is restored.
pub(crate) async fn run_tui(
    mut app: App,
    mut events: UnboundedReceiver<RunnerEvent>,
) -> Result<(App, TuiExit)> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    info!("TUI started");

    loop {
        terminal.draw(|f| draw(f.area(), f, &app))?;

        loop {
            match events.try_recv() {
                Ok(event) => app.handle_runner_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("Runner channel closed");
                    break;
                }
            }
        }

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && input::handle_key(&mut app, key)? {
                    break;
                }
            }
            continue;
        }

        let timeout = FRAME_TIME.saturating_sub(app.last_tick.elapsed());
        tokio::select! {
            Some(event) = events.recv() => app.handle_runner_event(event),
            _ = tokio::time::sleep(timeout) => {}
        }

        if app.last_tick.elapsed() >= FRAME_TIME {
            app.last_tick = Instant::now();
            app.animation.advance();
        }
    }

    let exit = app.exit.unwrap_or(TuiExit::Quit);
    info!("TUI exited");
    Ok((app, exit))
}

fn draw(area: Rect, f: &mut ratatui::Frame, app: &App) {
    let theme = Theme::default();

    let outer_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(0),    // content
        ])
        .split(area);

    let context = app.current_test().map(|view| {
        (
            format!("{}  {}", view.kind().title().to_uppercase(), phase_label(view.phase())),
            theme.phase_color(view.phase()),
        )
    });
    widgets::header::draw_header(
        outer_layout[0],
        f,
        &theme,
        context.as_ref().map(|(label, color)| (label.as_str(), *color)),
    );

    let inner = outer_layout[1];
    match app.view {
        View::MainMenu => screens::home::draw_home(inner, f, app, theme),
        View::Test(_) => screens::test::draw_test(inner, f, app, theme),
    }

    if app.modal.is_some() {
        screens::dialog::draw_modal(inner, f, app, theme);
    }
}
