//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `format`: Duration, date and show-notes formatting for display
//! - `episode`: API records and the display `Episode`
//! - `api_client`: Episodes REST client
//! - `player_state`: Playback queue and transport flags
//! - `playback`: Per-frame playback snapshot for the view
//! - `types`: UI state (pages, selection, overlays)
//! - `app_model`: Main application model with state management methods

mod format;
mod episode;
mod api_client;
mod player_state;
mod playback;
mod types;
mod app_model;

pub use format::{duration_to_string, format_header_date, strip_markup};

pub use episode::Episode;

pub use api_client::{EpisodesClient, SortOrder};

pub use player_state::PlaybackState;

pub use playback::PlaybackInfo;

pub use types::{Page, UiState};

pub use app_model::AppModel;
