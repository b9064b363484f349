//! Playback queue and transport flags
//!
//! `PlaybackState` is the single source of truth for what is queued and what
//! the transport controls should show. It is owned by the app model and only
//! mutated by the controller while holding the model's lock, so every
//! transition below runs to completion before the next one starts.

use rand::Rng;
use thiserror::Error;

use super::episode::Episode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("episode index {index} is out of range for a queue of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Clone, Debug, Default)]
pub struct PlaybackState {
    queue: Vec<Episode>,
    current_index: usize,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &[Episode] {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.queue.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_index + 1 < self.queue.len()
    }

    /// Replace the queue with a single episode and start playing it.
    pub fn play(&mut self, episode: Episode) {
        self.queue = vec![episode];
        self.current_index = 0;
        self.is_playing = true;
    }

    /// Replace the queue with `list` and start playing at `index`.
    ///
    /// An index outside the list is rejected and the current state is kept.
    pub fn play_list(&mut self, list: Vec<Episode>, index: usize) -> Result<(), PlaybackError> {
        if index >= list.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: list.len(),
            });
        }

        self.queue = list;
        self.current_index = index;
        self.is_playing = true;
        Ok(())
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn set_playing_state(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
    }

    pub fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
    }

    pub fn play_next(&mut self) {
        self.play_next_with(&mut rand::thread_rng());
    }

    /// Advance the queue. While shuffling, any index may be picked,
    /// including the current one.
    pub fn play_next_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.is_shuffling {
            if !self.queue.is_empty() {
                self.current_index = rng.gen_range(0..self.queue.len());
            }
        } else if self.has_next() {
            self.current_index += 1;
        }
    }

    pub fn play_previous(&mut self) {
        if self.has_previous() {
            self.current_index -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.current_index = 0;
    }
}
