//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, column widths, scrollable lists)
//! - `layout`: Header bar
//! - `content`: Episode list and episode detail pages
//! - `player`: Player panel
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod player;
mod overlays;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState, today: NaiveDate) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Page + player panel
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], today);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Current page
                Constraint::Percentage(35), // Player panel
            ])
            .split(chunks[1]);

        let current_playing_id = playback.episode.as_ref().map(|e| e.id.as_str());
        content::render_main_content(frame, main_chunks[0], ui_state, current_playing_id);

        player::render_player(frame, main_chunks[1], playback);

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::model::{Episode, PlaybackState, Page};

    fn episode() -> Episode {
        Episode {
            id: "o-que-e-o-vue".to_string(),
            title: "O que é o Vue".to_string(),
            members: "Diego e Richard".to_string(),
            thumbnail: "https://example.com/vue.jpg".to_string(),
            url: "https://example.com/vue.m4a".to_string(),
            duration: 3981,
            published_at: "8 Jan 21".to_string(),
            duration_as_string: "66:21".to_string(),
            description: "<p>Show &amp; tell</p>".to_string(),
        }
    }

    fn render_to_text(playback: &PlaybackInfo, ui_state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        terminal
            .draw(|f| AppView::render(f, playback, ui_state, today))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_player_prompts_for_selection() {
        let text = render_to_text(&PlaybackInfo::default(), &UiState::default());
        assert!(text.contains("Select a podcast to play"));
        assert!(text.contains("00:00 / 00:00"));
        assert!(text.contains("Mon, 19 October"));
        assert!(text.contains("Loading episodes..."));
    }

    #[test]
    fn loaded_player_shows_episode_and_progress() {
        let mut state = PlaybackState::new();
        state.play(episode());
        let playback = PlaybackInfo::from_state(&state, 61);

        let text = render_to_text(&playback, &UiState::default());
        assert!(text.contains("O que é o Vue"));
        assert!(text.contains("01:01 / 66:21"));
    }

    #[test]
    fn detail_page_renders_description_as_text() {
        let ui_state = UiState {
            page: Page::EpisodeDetail(Box::new(episode())),
            ..UiState::default()
        };

        let text = render_to_text(&PlaybackInfo::default(), &ui_state);
        assert!(text.contains("Show & tell"));
        assert!(!text.contains("<p>"));
        assert!(text.contains("66:21"));
    }
}
