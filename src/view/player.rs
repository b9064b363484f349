//! Player panel rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{duration_to_string, PlaybackInfo};

pub fn render_player(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ▶ Playing Now ")
        .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Episode info
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    render_episode_info(frame, chunks[0], playback);
    render_progress(frame, chunks[1], playback);
    render_controls(frame, chunks[2], playback);
}

fn render_episode_info(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let info = match &playback.episode {
        Some(episode) => Paragraph::new(vec![
            Line::from(Span::styled(
                episode.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(episode.members.clone(), Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(Span::styled(
                format!("Episode {} of {}", playback.current_index + 1, playback.queue_len),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        None => Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Select a podcast to play",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
        ]),
    };
    frame.render_widget(info.wrap(Wrap { trim: true }), area);
}

fn render_progress(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let duration = playback.duration();
    let elapsed = playback.elapsed.min(duration);

    let ratio = if duration > 0 {
        (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let label = format!("{} / {}", duration_to_string(elapsed), duration_to_string(duration));
    let gauge_style = if playback.controls_enabled() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(gauge_style)
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn control_style(enabled: bool, active: bool) -> Style {
    if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if active {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_controls(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let enabled = playback.controls_enabled();
    let play_symbol = if playback.is_playing { "⏸" } else { "▶" };

    let controls = Line::from(vec![
        Span::styled(
            "⤮ s",
            control_style(enabled && playback.shuffle_enabled(), playback.is_shuffling),
        ),
        Span::raw("   "),
        Span::styled("⏮ p", control_style(enabled && playback.has_previous, false)),
        Span::raw("   "),
        Span::styled(
            format!("{} space", play_symbol),
            control_style(enabled, false).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("⏭ n", control_style(enabled && playback.has_next, false)),
        Span::raw("   "),
        Span::styled("⟳ r", control_style(enabled, playback.is_looping)),
    ])
    .centered();

    frame.render_widget(Paragraph::new(controls), area);
}
