use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, Wrap,
    },
    Frame,
};

use crate::models::Status;
use super::app::FormApp;
use super::utils::centered_rect;

fn status_color(status: Status) -> Color {
    match status {
        Status::FullyWorking => Color::Green,
        Status::NotWorking => Color::Red,
        Status::Duplicate => Color::Yellow,
        Status::Skip => Color::Gray,
    }
}

pub fn ui(f: &mut Frame, app: &FormApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_app_list(f, chunks[1], app);
    render_controls(f, chunks[2], app);

    if app.show_help {
        render_help_popup(f);
    }
}

pub fn render_header(f: &mut Frame, area: Rect, app: &FormApp) {
    let title = format!("Classify Apps ({} total)", app.rows.len());
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

pub fn render_app_list(f: &mut Frame, area: Rect, app: &FormApp) {
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let badge = format!("[{:<13}] ", row.status.as_str());
            ListItem::new(Line::from(vec![
                Span::styled(badge, Style::default().fg(status_color(row.status))),
                Span::styled(row.label.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Apps")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state.clone());

    if app.rows.len() > area.height.saturating_sub(2) as usize {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll_state.clone(),
        );
    }
}

pub fn render_controls(f: &mut Frame, area: Rect, app: &FormApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let counts: Vec<Span> = Status::ALL
        .iter()
        .flat_map(|&status| {
            [
                Span::styled(
                    format!("{}: {}", status, app.count(status)),
                    Style::default().fg(status_color(status)),
                ),
                Span::raw("  "),
            ]
        })
        .collect();

    let summary = Paragraph::new(Line::from(counts))
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(summary, chunks[0]);

    let controls = Paragraph::new("Enter: process  ←/→: status  ?: help  q: quit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, chunks[1]);
}

pub fn render_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from(Span::styled("Classify Apps - Help", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  Up/k    - Move up"),
        Line::from("  Down/j  - Move down"),
        Line::from(""),
        Line::from("Status:"),
        Line::from("  Right/l/Space - Next status"),
        Line::from("  Left/h        - Previous status"),
        Line::from("  1-4           - Fully-Working / Not-Working / Duplicate / SKIP"),
        Line::from(""),
        Line::from("  Enter   - Move folders and rewrite changelog"),
        Line::from("  q/Esc   - Quit without changing anything"),
        Line::from(""),
        Line::from(Span::styled("Press Esc or ? to close", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppRecord;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &FormApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn sample() -> FormApp {
        FormApp::new(&[AppRecord {
            jam_file: "tetris.jam".into(),
            original_name: "テトリス".into(),
            translated_name: "Tetris".into(),
            folder: "Tetris".into(),
            status: Some(Status::NotWorking),
        }])
    }

    #[test]
    fn test_renders_rows_with_status() {
        let text = screen_text(&sample());
        assert!(text.contains("Classify Apps (1 total)"));
        assert!(text.contains("[Not-Working  ] tetris.jam: Tetris"));
        assert!(text.contains("Not-Working: 1"));
    }

    #[test]
    fn test_renders_help_popup() {
        let mut app = sample();
        app.toggle_help();
        assert!(screen_text(&app).contains("Classify Apps - Help"));
    }
}
