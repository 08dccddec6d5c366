//! Modal dialog overlay for history, tips and messages.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::tui::state::{App, ModalKind};
use crate::tui::theme::Theme;

pub(crate) fn draw_modal(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    let Some(modal) = &app.modal else {
        return;
    };

    let (icon, color) = match modal.kind {
        ModalKind::History => ("≡", theme.accent),
        ModalKind::Recommendations => ("★", theme.optimal),
        ModalKind::Error => ("✕", theme.critical),
        ModalKind::Info => ("i", theme.accent),
    };
    let footer = match modal.kind {
        ModalKind::History => "[↑/↓ scroll]  [Enter to close]",
        _ => "[Enter to close]",
    };

    let popup_area = centered_rect(80, 70, area);
    f.render_widget(Clear, popup_area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    f.render_widget(block, popup_area);

    let title = Line::from(vec![
        Span::styled(format!(" {icon}  "), Style::default().fg(color)),
        Span::styled(
            modal.title.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(title), layout[0]);

    let body = modal
        .lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                format!(" {line}"),
                Style::default().fg(theme.text),
            ))
        })
        .collect::<Vec<_>>();
    let para = Paragraph::new(Text::from(body))
        .wrap(Wrap { trim: false })
        .scroll((modal.scroll, 0));
    f.render_widget(para, layout[1]);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!(" {footer}"),
            Style::default().fg(theme.muted),
        )),
        layout[2],
    );
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(80, 50, parent);
        assert_eq!(popup.width, 80);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 10);
        assert_eq!(popup.y, 10);
    }
}
