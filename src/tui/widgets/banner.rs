//! ASCII art banner for the home screen.

use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::tui::theme::Theme;

// ASCII-only wordmark; a one-row fallback is used on narrow terminals.
const WORDMARK_FULL: &[&str] = &[
    "  ___  _   _ ___ ___ _  __ ___ ___ _  _  ___ _  _",
    " / _ \\| | | |_ _/ __| |/ /| _ ) __| \\| |/ __| || |",
    "| (_) | |_| || | (__| ' < | _ \\ _|| .` | (__| __ |",
    " \\__\\_\\\\___/|___\\___|_|\\_\\|___/___|_|\\_|\\___|_||_|",
];

const WORDMARK_COMPACT: &[&str] = &["QUICKBENCH"];

// 50 columns plus room for the shadow.
const WORDMARK_FULL_MIN_WIDTH: u16 = 52;
const WORDMARK_FULL_HEIGHT: u16 = 4;

pub(crate) fn draw_banner(area: Rect, f: &mut ratatui::Frame, theme: &Theme) {
    let full = area.width >= WORDMARK_FULL_MIN_WIDTH && area.height >= WORDMARK_FULL_HEIGHT;
    let wordmark = if full { WORDMARK_FULL } else { WORDMARK_COMPACT };

    f.render_widget(Clear, area);

    // Shadow is the same text offset by one cell.
    if full {
        let shadow_area = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width - 1,
            height: area.height - 1,
        };
        f.render_widget(
            wordmark_paragraph(wordmark, shadow_area.height, Style::default().fg(theme.muted)),
            shadow_area,
        );
    }

    let main_style = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    f.render_widget(wordmark_paragraph(wordmark, area.height, main_style), area);
}

fn wordmark_paragraph(rows: &'static [&'static str], height: u16, style: Style) -> Paragraph<'static> {
    let lines = rows
        .iter()
        .take(height as usize)
        .map(|row| Line::from(Span::styled(*row, style)))
        .collect::<Vec<_>>();
    Paragraph::new(lines).alignment(Alignment::Center)
}
