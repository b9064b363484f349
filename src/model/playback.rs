//! Read-only playback snapshot handed to the view

use super::episode::Episode;
use super::player_state::PlaybackState;

/// Everything the player panel needs to draw one frame
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub episode: Option<Episode>,
    pub queue_len: usize,
    pub current_index: usize,
    pub elapsed: u64,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PlaybackInfo {
    pub fn from_state(state: &PlaybackState, elapsed: u64) -> Self {
        Self {
            episode: state.current_episode().cloned(),
            queue_len: state.queue().len(),
            current_index: state.current_index(),
            elapsed,
            is_playing: state.is_playing(),
            is_looping: state.is_looping(),
            is_shuffling: state.is_shuffling(),
            has_previous: state.has_previous(),
            has_next: state.has_next(),
        }
    }

    pub fn duration(&self) -> u64 {
        self.episode.as_ref().map(|e| e.duration).unwrap_or(0)
    }

    /// Transport controls are inert while nothing is queued.
    pub fn controls_enabled(&self) -> bool {
        self.queue_len > 0
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.queue_len > 1
    }
}
