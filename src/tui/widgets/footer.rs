//! Context-sensitive keybind footer bar.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;

/// One footer entry. Disabled hints stay visible but dimmed, so a control
/// that is blocked (Back during a run) reads as disabled rather than missing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Hint<'a> {
    pub key: &'a str,
    pub action: &'a str,
    pub enabled: bool,
}

impl<'a> Hint<'a> {
    pub const fn on(key: &'a str, action: &'a str) -> Self {
        Self {
            key,
            action,
            enabled: true,
        }
    }

    pub const fn when(key: &'a str, action: &'a str, enabled: bool) -> Self {
        Self {
            key,
            action,
            enabled,
        }
    }
}

pub(crate) fn draw_footer(area: Rect, f: &mut ratatui::Frame, theme: &Theme, hints: &[Hint]) {
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(theme.muted)));
        }
        let (key_color, action_color) = if hint.enabled {
            (theme.accent, theme.text_dim)
        } else {
            (theme.muted, theme.muted)
        };
        spans.push(Span::styled(hint.key, Style::default().fg(key_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(action_color),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
