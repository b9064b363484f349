//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and keeps the media engine in step
//! with the playback state.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Transport operations and media synchronisation
//! - `navigation`: Episode list and detail pages
//! - `player_events`: Media engine event listener

mod input;
mod playback;
mod navigation;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::audio::AudioBackend;
use crate::model::{AppModel, SortOrder};

/// Seconds skipped by a single seek key press.
pub const SEEK_STEP_SECS: u64 = 15;

/// What the media engine was last told, so only changes are forwarded.
#[derive(Debug, Default)]
pub(crate) struct MediaSync {
    loaded_url: Option<String>,
    // Bumped on every load; events from older loads are ignored.
    generation: u64,
    playing: bool,
    looping: bool,
}

impl MediaSync {
    fn is_current(&self, generation: u64) -> bool {
        self.loaded_url.is_some() && self.generation == generation
    }

    /// Forget the loaded resource so the next transition loads it again.
    fn forget_load(&mut self) {
        self.loaded_url = None;
        self.playing = false;
    }
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) audio_backend: Arc<AudioBackend>,
    media_sync: Arc<Mutex<MediaSync>>,
    event_listener_started: Arc<Mutex<bool>>,
    list_limit: usize,
    list_order: SortOrder,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        audio_backend: Arc<AudioBackend>,
        list_limit: usize,
        list_order: SortOrder,
    ) -> Self {
        Self {
            model,
            audio_backend,
            media_sync: Arc::new(Mutex::new(MediaSync::default())),
            event_listener_started: Arc::new(Mutex::new(false)),
            list_limit,
            list_order,
        }
    }

    /// Start the media event listener unless it is already running
    pub async fn try_start_event_listener(&self) {
        let mut started = self.event_listener_started.lock().await;
        if *started {
            return;
        }

        if let Some(event_channel) = self.audio_backend.take_event_channel().await {
            *started = true;
            drop(started);
            self.start_media_event_listener(event_channel);
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = format!("{error:#}");

        if error_str.contains("404") {
            "Episode not found.".to_string()
        } else if error_str.contains("error sending request") || error_str.contains("Connection refused") {
            "Could not reach the episodes API. Is it running?".to_string()
        } else if error_str.contains("429") {
            "Rate limited. Please wait a moment.".to_string()
        } else if error_str.contains("media engine is not running") {
            "Audio playback stopped working. Please restart the app.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
