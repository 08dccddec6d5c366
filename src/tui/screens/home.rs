//! Main menu drawing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};

use crate::benchmark::TestKind;
use crate::tui::state::{App, MenuChoice};
use crate::tui::theme::Theme;
use crate::tui::widgets::banner::draw_banner;
use crate::tui::widgets::footer::{draw_footer, Hint};

fn menu_entry(choice: MenuChoice) -> (&'static str, &'static str) {
    match choice {
        MenuChoice::Test(kind) => (kind.title(), test_blurb(kind)),
        MenuChoice::History => ("History", "Show all saved results, newest first"),
        MenuChoice::Recommendations => ("Recommendations", "General tips for better performance"),
        MenuChoice::Quit => ("Exit", "Close the application"),
    }
}

fn test_blurb(kind: TestKind) -> &'static str {
    match kind {
        TestKind::Cpu => "Processor benchmark",
        TestKind::Ram => "Memory benchmark",
        TestKind::Disk => "Storage benchmark",
    }
}

fn shortcut(choice: MenuChoice) -> &'static str {
    match choice {
        MenuChoice::Test(TestKind::Cpu) => "1",
        MenuChoice::Test(TestKind::Ram) => "2",
        MenuChoice::Test(TestKind::Disk) => "3",
        MenuChoice::History => "H",
        MenuChoice::Recommendations => "R",
        MenuChoice::Quit => "Q",
    }
}

pub(crate) fn draw_home(area: Rect, f: &mut ratatui::Frame, app: &App, theme: Theme) {
    // Shrink the banner before the menu in short terminals.
    let min_menu_h: u16 = 3;
    let footer_h: u16 = area.height.min(1);
    let tagline_h: u16 = if area.height >= 16 { 2 } else { 0 };
    let banner_h = 5u16
        .min(area.height.saturating_sub(min_menu_h + footer_h + tagline_h))
        .max(area.height.min(1));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_h),
            Constraint::Length(tagline_h),
            Constraint::Min(0),
            Constraint::Length(footer_h),
        ])
        .split(area);

    draw_banner(layout[0], f, &theme);

    if layout[1].height > 0 {
        let tagline = Paragraph::new(Line::from(Span::styled(
            "Quick CPU, RAM and Disk checks with a local result history.",
            Style::default().fg(theme.text_dim),
        )));
        f.render_widget(tagline, layout[1]);
    }

    let items = MenuChoice::ALL
        .iter()
        .map(|&choice| {
            let (label, desc) = menu_entry(choice);
            let selected = choice == app.menu_choice;
            let label_color = match choice {
                MenuChoice::Test(kind) if selected => theme.kind_color(kind),
                _ if selected => theme.accent,
                _ => theme.text,
            };
            let mut label_style = Style::default().fg(label_color);
            if selected {
                label_style = label_style.add_modifier(Modifier::BOLD);
            }
            let selector = if selected { "›" } else { " " };

            let mut first = vec![
                Span::styled(format!(" {selector} "), label_style),
                Span::styled(
                    format!("[{}] ", shortcut(choice)),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(label, label_style),
            ];
            if let MenuChoice::Test(kind) = choice {
                if let Some(score) = app.test_view(kind).last_result() {
                    first.push(Span::styled(
                        format!("  last: {score}"),
                        Style::default().fg(theme.text_dim),
                    ));
                }
            }

            ListItem::new(vec![
                Line::from(first),
                Line::from(vec![
                    Span::raw("         "),
                    Span::styled(desc, Style::default().fg(theme.muted)),
                ]),
            ])
        })
        .collect::<Vec<_>>();

    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(menu, layout[2]);

    if layout[3].height > 0 {
        draw_footer(
            layout[3],
            f,
            &theme,
            &[
                Hint::on("↑/↓", "Navigate"),
                Hint::on("Enter", "Select"),
                Hint::on("1-3", "Tests"),
                Hint::on("H", "History"),
                Hint::on("R", "Tips"),
                Hint::on("Esc", "Quit"),
            ],
        );
    }
}
