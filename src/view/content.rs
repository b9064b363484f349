//! Main content area rendering (episode list and episode detail pages)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{strip_markup, Episode, Page, UiState};
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    current_playing_id: Option<&str>,
) {
    match &ui_state.page {
        Page::EpisodeList => render_episode_list(frame, area, ui_state, current_playing_id),
        Page::EpisodeDetail(episode) => render_episode_detail(frame, area, episode, ui_state.detail_scroll),
    }
}

fn render_episode_list(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    current_playing_id: Option<&str>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Latest episodes ")
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if ui_state.episodes.is_empty() {
        let message = if ui_state.is_loading {
            "Loading episodes..."
        } else {
            "No episodes found"
        };
        let empty = Paragraph::new(format!("  {}", message))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items = episode_items(&ui_state.episodes, ui_state.episode_selected, current_playing_id, content_width);

    // +1 for header row
    render_scrollable_list(frame, area, items, ui_state.episode_selected + 1, block);
}

fn episode_items(
    episodes: &[Episode],
    selected: usize,
    current_playing_id: Option<&str>,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(episodes.len());
    let date_width = 9;
    let duration_width = 8;
    let fixed_width = 1 + num_width + 3 + 3 + 3 + date_width + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 60) / 100;
    let members_width = remaining_width.saturating_sub(title_width);

    let mut items = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<title_width$}   {:<members_width$}   {:<date_width$}   {}",
            "#", "Title", "Members", "Date", "Duration",
            num_width = num_width,
            title_width = title_width,
            members_width = members_width,
            date_width = date_width,
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    ];

    items.extend(episodes.iter().enumerate().map(|(i, episode)| {
        let is_playing = current_playing_id == Some(episode.id.as_str());
        let style = if i == selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if is_playing {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let playing_indicator = if is_playing { "▶" } else { " " };
        let num = format!("{}{:<num_width$}", playing_indicator, i + 1, num_width = num_width);

        ListItem::new(format!(
            "{}   {}   {}   {:<date_width$}   {}",
            num,
            truncate_string(&episode.title, title_width),
            truncate_string(&episode.members, members_width),
            episode.published_at,
            episode.duration_as_string,
            date_width = date_width,
        ))
        .style(style)
    }));

    items
}

fn render_episode_detail(frame: &mut Frame, area: Rect, episode: &Episode, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Title, credits, meta
            Constraint::Min(0),    // Description
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            episode.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(episode.members.clone(), Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled(episode.published_at.clone(), Style::default().fg(Color::Cyan)),
            Span::raw("  ·  "),
            Span::styled(episode.duration_as_string.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(episode.thumbnail.clone(), Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Episode (Enter to play, Esc to go back) ")
            .padding(Padding::horizontal(1))
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(header, chunks[0]);

    let description = Paragraph::new(strip_markup(&episode.description))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Description ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(description, chunks[1]);
}
