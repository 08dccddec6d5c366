//! TUI keyboard input handling.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::benchmark::TestKind;

use super::state::*;

/// Returns `Ok(true)` when the app should exit.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(app.request_quit());
    }

    if app.modal.is_some() {
        handle_modal_key(app, key);
        return Ok(false);
    }

    match app.view {
        View::MainMenu => Ok(handle_menu_key(app, key)),
        View::Test(_) => {
            handle_test_key(app, key);
            Ok(false)
        }
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
        app.close_modal();
        return;
    }
    let Some(modal) = app.modal.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Up => modal.scroll = modal.scroll.saturating_sub(1),
        KeyCode::Down => modal.scroll = modal.scroll.saturating_add(1).min(max_scroll(modal)),
        KeyCode::PageUp => modal.scroll = modal.scroll.saturating_sub(10),
        KeyCode::PageDown => modal.scroll = modal.scroll.saturating_add(10).min(max_scroll(modal)),
        _ => {}
    }
}

fn max_scroll(modal: &ModalState) -> u16 {
    u16::try_from(modal.lines.len().saturating_sub(1)).unwrap_or(u16::MAX)
}

fn activate(app: &mut App, choice: MenuChoice) -> bool {
    app.menu_choice = choice;
    match choice {
        MenuChoice::Test(kind) => {
            app.select_view(View::Test(kind));
            false
        }
        MenuChoice::History => {
            app.open_history();
            false
        }
        MenuChoice::Recommendations => {
            app.open_recommendations();
            false
        }
        MenuChoice::Quit => app.request_quit(),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.menu_choice = app.menu_choice.prev();
            false
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
            app.menu_choice = app.menu_choice.next();
            false
        }
        KeyCode::Enter => activate(app, app.menu_choice),
        KeyCode::Char('1') => activate(app, MenuChoice::Test(TestKind::Cpu)),
        KeyCode::Char('2') => activate(app, MenuChoice::Test(TestKind::Ram)),
        KeyCode::Char('3') => activate(app, MenuChoice::Test(TestKind::Disk)),
        KeyCode::Char('h') | KeyCode::Char('H') => activate(app, MenuChoice::History),
        KeyCode::Char('r') | KeyCode::Char('R') => activate(app, MenuChoice::Recommendations),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => activate(app, MenuChoice::Quit),
        _ => false,
    }
}

fn handle_test_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => {
            app.start_current();
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            app.cancel_current();
        }
        // Back is ignored while the run is in flight.
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('B') => {
            app.select_view(View::MainMenu);
        }
        KeyCode::Char('e') | KeyCode::Char('E') => app.export_current(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.compare_current(),
        KeyCode::Char('h') | KeyCode::Char('H') => app.open_history(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.open_recommendations(),
        _ => {}
    }
}
