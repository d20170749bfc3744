pub mod screen;
pub mod session_list;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use rewind::{
    cursor::{to_surface, Surface},
    player::Player,
    util::{format_clock, format_start_date},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

const ACCENT: Color = Color::Rgb(29, 205, 159);
const CURSOR_SYMBOL: &str = "➤";
const CLICK_SYMBOL: &str = "◎";

/// Regions of the replay screen
pub struct ReplayLayout {
    pub info: Rect,
    pub surface_block: Rect,
    pub controls: Rect,
    pub event: Rect,
    pub legend: Rect,
}

impl ReplayLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // session info bar
                Constraint::Min(3),    // replay surface
                Constraint::Length(1), // controls
                Constraint::Length(1), // current event
                Constraint::Length(1), // legend
            ])
            .split(area);

        Self {
            info: chunks[0],
            surface_block: chunks[1],
            controls: chunks[2],
            event: chunks[3],
            legend: chunks[4],
        }
    }

    /// Drawable cells inside the surface border
    pub fn surface(&self) -> Rect {
        surface_block().inner(self.surface_block)
    }
}

fn surface_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Measure the replay surface for the current frame size. Zero-sized areas
/// count as unmounted.
pub fn measure_surface(area: Rect) -> Option<Surface> {
    let inner = ReplayLayout::new(area).surface();
    if inner.width == 0 || inner.height == 0 {
        None
    } else {
        Some(Surface::new(inner.width as f64, inner.height as f64))
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(player) = self.player.as_ref() else {
            Paragraph::new(Span::styled(
                "No sessions loaded",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        };

        let layout = ReplayLayout::new(area);
        render_info_bar(self, player, layout.info, buf);
        render_surface(player, &layout, buf);
        render_controls(player, layout.controls, buf);
        render_event_line(player, layout.event, buf);

        let mut legend = String::from(
            "(space) play/pause / (←→) seek / (0-9) jump / ([ ]) session / (l)ist / (esc)ape",
        );
        if !player.has_events() {
            legend = format!("no events recorded / {legend}");
        }
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(layout.legend, buf);
    }
}

fn render_info_bar(app: &App, player: &Player, area: Rect, buf: &mut Buffer) {
    let session = player.session();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let (trend, trend_style) = if session.conversion_success {
        ("↗", Style::default().fg(ACCENT))
    } else {
        ("↘", Style::default().fg(Color::Red))
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{trend} "), trend_style),
        Span::styled(format!("Session: {}", session.id), bold_style),
        Span::styled(
            format!("  {}/{}", app.selected + 1, app.sessions.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{}   {} / {}   {} → {}",
            format_start_date(&session.start_time),
            session.device,
            session.browser,
            session.landing_page,
            session.exit_page
        ),
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Right)
    .render(chunks[1], buf);
}

fn render_surface(player: &Player, layout: &ReplayLayout, buf: &mut Buffer) {
    surface_block().render(layout.surface_block, buf);
    let inner = layout.surface();
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if let Some(snapshot) = &player.session().content_snapshot {
        Paragraph::new(strip_markup(snapshot))
            .style(Style::default().add_modifier(Modifier::DIM))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    let surface = Surface::new(inner.width as f64, inner.height as f64);
    let ripple_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    for click in player.clicks() {
        let pos = to_surface(click.x, click.y, surface);
        let (x, y) = cell_in(inner, pos.x, pos.y);
        buf.set_string(x, y, CLICK_SYMBOL, ripple_style);
    }

    if let Some(cursor) = player.cursor() {
        let (x, y) = cell_in(inner, cursor.x, cursor.y);
        buf.set_string(
            x,
            y,
            CURSOR_SYMBOL,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        );
    }
}

/// Clamp a surface coordinate to a cell inside `inner`
fn cell_in(inner: Rect, x: f64, y: f64) -> (u16, u16) {
    let cx = (x.max(0.0) as u16).min(inner.width.saturating_sub(1));
    let cy = (y.max(0.0) as u16).min(inner.height.saturating_sub(1));
    (inner.x + cx, inner.y + cy)
}

fn render_controls(player: &Player, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(16),
            Constraint::Min(5),
        ])
        .split(area);

    let glyph = if player.is_playing() { "■" } else { "▶" };
    Paragraph::new(Span::styled(
        glyph,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
    .render(chunks[0], buf);

    Paragraph::new(format!(
        "{} / {}",
        format_clock(player.current_time_ms()),
        format_clock(player.session().duration_secs as f64 * 1000.0)
    ))
    .render(chunks[1], buf);

    let progress = player.progress_percent().clamp(0.0, 100.0);
    Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Rgb(34, 34, 34)))
        .ratio(progress / 100.0)
        .label(format!("{progress:.0}%"))
        .render(chunks[2], buf);
}

fn render_event_line(player: &Player, area: Rect, buf: &mut Buffer) {
    let (kind, x, y) = match player.current_event() {
        Some(e) => (e.kind.to_string(), e.x, e.y),
        None => ("none".to_string(), 0.0, 0.0),
    };
    Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(ACCENT)),
        Span::styled(
            format!("Current event: {kind} at ({x:.0}, {y:.0})"),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .render(area, buf);
}

/// Drop markup tags so a page snapshot reads as plain text
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
