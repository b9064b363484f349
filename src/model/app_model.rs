//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::api_client::EpisodesClient;
use super::episode::Episode;
use super::format::strip_markup;
use super::playback::PlaybackInfo;
use super::player_state::PlaybackState;
use super::types::{Page, UiState};

/// Errors are dismissed automatically after this many seconds.
const ERROR_DISPLAY_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    pub episodes_client: Option<EpisodesClient>,
    player: Arc<Mutex<PlaybackState>>,
    // Seconds into the current episode, mirrored from media time updates.
    elapsed: Arc<Mutex<u64>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            episodes_client: None,
            player: Arc::new(Mutex::new(PlaybackState::new())),
            elapsed: Arc::new(Mutex::new(0)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_episodes_client(&mut self, client: EpisodesClient) {
        self.episodes_client = Some(client);
    }

    pub async fn get_episodes_client(&self) -> Option<EpisodesClient> {
        self.episodes_client.clone()
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Run one transition against the playback state.
    pub async fn update_player<T>(&self, f: impl FnOnce(&mut PlaybackState) -> T) -> T {
        let mut player = self.player.lock().await;
        f(&mut player)
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        let player = self.player.lock().await;
        let elapsed = *self.elapsed.lock().await;
        PlaybackInfo::from_state(&player, elapsed)
    }

    pub async fn set_elapsed(&self, seconds: u64) {
        *self.elapsed.lock().await = seconds;
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Pages & navigation
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_loading(&self, loading: bool) {
        self.ui_state.lock().await.is_loading = loading;
    }

    pub async fn set_episodes(&self, episodes: Vec<Episode>) {
        let mut state = self.ui_state.lock().await;
        state.episodes = episodes;
        state.episode_selected = 0;
        state.is_loading = false;
    }

    pub async fn get_episodes(&self) -> Vec<Episode> {
        self.ui_state.lock().await.episodes.clone()
    }

    pub async fn get_selected_index(&self) -> usize {
        self.ui_state.lock().await.episode_selected
    }

    pub async fn get_selected_episode(&self) -> Option<Episode> {
        self.ui_state.lock().await.selected_episode().cloned()
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.page {
            Page::EpisodeList => {
                if state.episode_selected > 0 {
                    state.episode_selected -= 1;
                }
            }
            Page::EpisodeDetail(_) => {
                state.detail_scroll = state.detail_scroll.saturating_sub(1);
            }
        }
    }

    pub async fn move_selection_down(&self) {
        let mut guard = self.ui_state.lock().await;
        let state = &mut *guard;
        match &state.page {
            Page::EpisodeList => {
                if state.episode_selected < state.episodes.len().saturating_sub(1) {
                    state.episode_selected += 1;
                }
            }
            Page::EpisodeDetail(episode) => {
                // Stop once the last line of the notes reaches the top.
                let last_line = strip_markup(&episode.description).lines().count().saturating_sub(1);
                let limit = u16::try_from(last_line).unwrap_or(u16::MAX);
                state.detail_scroll = state.detail_scroll.saturating_add(1).min(limit);
            }
        }
    }

    pub async fn show_episode_detail(&self, episode: Episode) {
        let mut state = self.ui_state.lock().await;
        state.page = Page::EpisodeDetail(Box::new(episode));
        state.detail_scroll = 0;
        state.is_loading = false;
    }

    pub async fn get_detail_episode(&self) -> Option<Episode> {
        match &self.ui_state.lock().await.page {
            Page::EpisodeDetail(episode) => Some(episode.as_ref().clone()),
            Page::EpisodeList => None,
        }
    }

    pub async fn navigate_back(&self) {
        let mut state = self.ui_state.lock().await;
        state.page = Page::EpisodeList;
        state.detail_scroll = 0;
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
        state.is_loading = false;
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}
