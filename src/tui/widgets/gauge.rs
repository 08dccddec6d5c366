//! Horizontal countdown bar.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;

const LABEL_WIDTH: usize = 10;

/// Width of the filled part for `value` out of `max`, given `width` cells.
pub(crate) fn filled_cells(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return width;
    }
    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    (width as f64 * ratio).round() as usize
}

pub(crate) fn draw_gauge(
    area: Rect,
    f: &mut ratatui::Frame,
    theme: &Theme,
    label: &str,
    value: u64,
    max: u64,
    color: Color,
) {
    let suffix = format!(" {value:>3}/{max}s");
    let bar_width = (area.width as usize)
        .saturating_sub(LABEL_WIDTH)
        .saturating_sub(suffix.chars().count());

    let filled = filled_cells(value, max, bar_width);
    let empty = bar_width.saturating_sub(filled);

    let line = Line::from(vec![
        Span::styled(
            format!("{label:<width$}", width = LABEL_WIDTH),
            Style::default().fg(theme.text_dim),
        ),
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled("░".repeat(empty), Style::default().fg(theme.muted)),
        Span::styled(suffix, Style::default().fg(theme.text)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(0, 20, 40), 0);
        assert_eq!(filled_cells(10, 20, 40), 20);
        assert_eq!(filled_cells(25, 20, 40), 40);
        assert_eq!(filled_cells(3, 0, 40), 40);
    }
}
