//! Rounded bordered panel with an optional status badge.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::tui::theme::Theme;

pub(crate) struct CardWidget<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    badge: Option<(&'a str, Color)>,
    accent: Option<Color>,
}

impl<'a> CardWidget<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            badge: None,
            accent: None,
        }
    }

    pub fn line(mut self, line: Line<'a>) -> Self {
        self.lines.push(line);
        self
    }

    /// Right of the title, e.g. `[RUNNING]`.
    pub fn badge(mut self, label: &'a str, color: Color) -> Self {
        self.badge = Some((label, color));
        self
    }

    /// Colors both the border and the title.
    pub fn border_color(mut self, color: Color) -> Self {
        self.accent = Some(color);
        self
    }

    pub fn render(self, area: Rect, f: &mut ratatui::Frame, theme: &Theme) {
        let accent = self.accent.unwrap_or(theme.border);
        let title_color = self.accent.unwrap_or(theme.text);

        let mut title = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some((label, color)) = self.badge {
            title.push(Span::styled(
                format!("[{label}] "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent));

        f.render_widget(
            Paragraph::new(Text::from(self.lines))
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}
