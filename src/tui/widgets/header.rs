//! Top header bar with title and context.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;

pub(crate) fn draw_header(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    context: Option<(&str, Color)>,
) {
    let mut spans = vec![Span::styled(
        "QUICKBENCH",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some((ctx, color)) = context {
        spans.push(Span::styled("  //  ", Style::default().fg(theme.muted)));
        spans.push(Span::styled(ctx.to_string(), Style::default().fg(color)));
    }

    let rule = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(theme.border),
    ));

    f.render_widget(Paragraph::new(vec![Line::from(spans), rule]), area);
}
