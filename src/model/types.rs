//! Core type definitions for the application

use std::time::Instant;

use super::episode::Episode;

/// Which page fills the main content area
#[derive(Clone, Debug, Default)]
pub enum Page {
    #[default]
    EpisodeList,
    EpisodeDetail(Box<Episode>),
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub page: Page,
    pub episodes: Vec<Episode>,
    pub episode_selected: usize,
    pub is_loading: bool,
    pub detail_scroll: u16,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            page: Page::EpisodeList,
            episodes: Vec::new(),
            episode_selected: 0,
            is_loading: true,
            detail_scroll: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}

impl UiState {
    pub fn selected_episode(&self) -> Option<&Episode> {
        self.episodes.get(self.episode_selected)
    }
}
