//! Layout rendering (header bar)

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    widgets::Padding,
    Frame,
};

use crate::model::format_header_date;

pub const APP_NAME: &str = "Podcastr";
pub const TAGLINE: &str = "Always the best for you to listen";

pub fn render_header(frame: &mut Frame, area: Rect, today: NaiveDate) {
    let date = format_header_date(today);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),                          // Logo + tagline
            Constraint::Length(date.chars().count() as u16 + 4), // Date
        ])
        .split(area);

    let brand = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("🎧 {}", APP_NAME),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(TAGLINE, Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(brand, chunks[0]);

    let date = Paragraph::new(date)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(date, chunks[1]);
}
