use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rewind::{
    session::Session,
    util::{format_clock, format_start_date, truncate_width},
};

use crate::App;

/// Pure presenter for a single session row
pub fn present_row(session: &Session, is_cursor: bool, is_selected: bool) -> Row<'static> {
    let marker = if is_selected { "▶" } else { " " };
    let (conv_text, conv_color) = if session.conversion_success {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };

    let row = Row::new(vec![
        Cell::from(format!("{marker} {}", truncate_width(&session.id, 14))),
        Cell::from(truncate_width(&session.user_id, 10)),
        Cell::from(session.device.to_string()),
        Cell::from(truncate_width(&session.browser, 8)),
        Cell::from(format_clock(session.duration_secs as f64 * 1000.0)),
        Cell::from(session.click_count().to_string()),
        Cell::from(conv_text).style(Style::default().fg(conv_color)),
        Cell::from(format_start_date(&session.start_time)),
    ]);

    if is_cursor {
        row.style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    } else {
        row
    }
}

/// Keep `cursor` inside the visible window of `height` rows
pub fn clamp_offset(offset: usize, cursor: usize, height: usize) -> usize {
    if height == 0 {
        return cursor;
    }
    if cursor < offset {
        cursor
    } else if cursor >= offset + height {
        cursor + 1 - height
    } else {
        offset
    }
}

pub fn render_session_list(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Summary
            Constraint::Min(0),    // Session table
            Constraint::Length(1), // Instructions
        ])
        .split(area);

    let summary = Paragraph::new(app.stats.summary_line())
        .block(Block::default().borders(Borders::ALL).title("Sessions"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(summary, chunks[0]);

    // borders and header
    let table_height = chunks[1].height.saturating_sub(3) as usize;
    app.list_offset = clamp_offset(app.list_offset, app.list_cursor, table_height);

    let header = Row::new(vec![
        Cell::from("  Session"),
        Cell::from("User"),
        Cell::from("Device"),
        Cell::from("Browser"),
        Cell::from("Length"),
        Cell::from("Clicks"),
        Cell::from("Conv"),
        Cell::from("Date"),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .sessions
        .iter()
        .enumerate()
        .skip(app.list_offset)
        .take(table_height)
        .map(|(i, s)| present_row(s, i == app.list_cursor, i == app.selected))
        .collect();

    let scroll_info = if app.sessions.len() > table_height {
        format!(" ({}/{})", app.list_cursor + 1, app.sessions.len())
    } else {
        String::new()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(17),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Recorded sessions{scroll_info}")),
    );
    f.render_widget(table, chunks[1]);

    let instructions = Paragraph::new("(↑↓) move / (enter) replay / (l/esc) back / (q)uit")
        .style(Style::default().add_modifier(Modifier::ITALIC));
    f.render_widget(instructions, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use rewind::config::Config;
    use rewind::session::Device;

    fn sessions(n: usize) -> Vec<Session> {
        (0..n)
            .map(|i| Session {
                id: format!("session-{}", i + 1),
                user_id: format!("user-{i}"),
                device: Device::Mobile,
                browser: "Firefox".into(),
                duration_secs: 75,
                start_time: "2024-03-01".into(),
                events: vec![],
                conversion_success: i % 2 == 0,
                landing_page: "/".into(),
                exit_page: "/".into(),
                content_snapshot: None,
            })
            .collect()
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_session_list(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_clamp_offset() {
        assert_eq!(clamp_offset(0, 0, 5), 0);
        assert_eq!(clamp_offset(0, 4, 5), 0);
        assert_eq!(clamp_offset(0, 5, 5), 1);
        assert_eq!(clamp_offset(3, 1, 5), 1);
        assert_eq!(clamp_offset(2, 7, 0), 7);
    }

    #[test]
    fn test_render_lists_sessions() {
        let mut app = App::new(sessions(3), Config::default());
        let text = draw(&mut app, 100, 20);
        assert!(text.contains("session-1"));
        assert!(text.contains("session-3"));
        assert!(text.contains("01:15"));
        assert!(text.contains("3 sessions"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut app = App::new(sessions(40), Config::default());
        app.list_cursor = 39;
        let text = draw(&mut app, 100, 15);
        assert!(app.list_offset > 0);
        assert!(text.contains("session-40"));
        assert!(text.contains("(40/40)"));
    }
}
