//! Transport operations and media synchronisation

use anyhow::Result;

use crate::model::{AppModel, Episode, PlaybackInfo, PlaybackState};

use super::{AppController, SEEK_STEP_SECS};

impl AppController {
    /// Apply one transition to the playback state, then bring the media
    /// engine in line with the result. The model lock is held throughout so
    /// transitions never interleave.
    pub(crate) async fn transition<T>(
        &self,
        force_reload: bool,
        f: impl FnOnce(&mut PlaybackState) -> T,
    ) -> T {
        let model = self.model.lock().await;
        self.transition_locked(&model, force_reload, f).await
    }

    /// `transition` for callers already holding the model lock.
    pub(crate) async fn transition_locked<T>(
        &self,
        model: &AppModel,
        force_reload: bool,
        f: impl FnOnce(&mut PlaybackState) -> T,
    ) -> T {
        let (output, state) = model
            .update_player(|player| {
                let output = f(player);
                (output, player.clone())
            })
            .await;

        if let Err(e) = self.sync_media(model, &state, force_reload).await {
            tracing::error!(error = %e, "Failed to update media engine");
            model.set_error(Self::format_error(&e)).await;
        }
        output
    }

    async fn sync_media(&self, model: &AppModel, state: &PlaybackState, force_reload: bool) -> Result<()> {
        let mut sync = self.media_sync.lock().await;
        let audio = &self.audio_backend;

        let mut reloaded = false;
        match state.current_episode() {
            None => {
                if sync.loaded_url.take().is_some() {
                    tracing::debug!("Queue emptied, unloading media");
                    audio.unload()?;
                    model.set_elapsed(0).await;
                }
            }
            Some(episode) => {
                if force_reload || sync.loaded_url.as_deref() != Some(episode.url.as_str()) {
                    sync.generation += 1;
                    tracing::info!(
                        id = %episode.id,
                        title = %episode.title,
                        index = state.current_index(),
                        generation = sync.generation,
                        "Loading episode"
                    );
                    audio.load(&episode.url, episode.duration, sync.generation)?;
                    sync.loaded_url = Some(episode.url.clone());
                    model.set_elapsed(0).await;
                    reloaded = true;
                }
            }
        }

        if sync.looping != state.is_looping() {
            audio.set_loop(state.is_looping())?;
            sync.looping = state.is_looping();
        }

        if reloaded || sync.playing != state.is_playing() {
            if state.is_playing() {
                audio.play()?;
            } else {
                audio.pause()?;
            }
            sync.playing = state.is_playing();
        }

        Ok(())
    }

    pub async fn playback_info(&self) -> PlaybackInfo {
        self.model.lock().await.get_playback_info().await
    }

    pub async fn play_episode(&self, episode: Episode) {
        tracing::debug!(id = %episode.id, "Playing single episode");
        self.transition(false, |p| p.play(episode)).await;
    }

    pub async fn play_episode_list(&self, list: Vec<Episode>, index: usize) {
        tracing::debug!(len = list.len(), index, "Playing episode list");
        if let Err(e) = self.transition(false, |p| p.play_list(list, index)).await {
            tracing::warn!(error = %e, "Rejected episode list");
            let model = self.model.lock().await;
            model.set_error(format!("Cannot play that episode: {e}")).await;
        }
    }

    pub async fn toggle_playback(&self) {
        if !self.playback_info().await.controls_enabled() {
            return;
        }
        let playing = self
            .transition(false, |p| {
                p.toggle_play();
                p.is_playing()
            })
            .await;
        tracing::info!(action = if playing { "resumed" } else { "paused" }, "Playback toggled");
    }

    /// Mirror the media element's own play/pause state back into the queue.
    pub async fn set_playing_state(&self, playing: bool) {
        self.transition(false, |p| p.set_playing_state(playing)).await;
    }

    pub async fn next_episode(&self) {
        let info = self.playback_info().await;
        if !info.controls_enabled() || !info.has_next {
            return;
        }
        // A shuffle pick can land on the episode already playing; start it over.
        let index = self.transition(info.is_shuffling, |p| {
            p.play_next();
            p.current_index()
        })
        .await;
        tracing::info!(index, "Skipped to next episode");
    }

    pub async fn previous_episode(&self) {
        let info = self.playback_info().await;
        if !info.controls_enabled() || !info.has_previous {
            return;
        }
        let index = self.transition(false, |p| {
            p.play_previous();
            p.current_index()
        })
        .await;
        tracing::info!(index, "Went back to previous episode");
    }

    pub async fn toggle_shuffle(&self) {
        if !self.playback_info().await.shuffle_enabled() {
            return;
        }
        let shuffling = self
            .transition(false, |p| {
                p.toggle_shuffle();
                p.is_shuffling()
            })
            .await;
        tracing::info!(shuffling, "Shuffle toggled");
    }

    pub async fn toggle_loop(&self) {
        if !self.playback_info().await.controls_enabled() {
            return;
        }
        let looping = self
            .transition(false, |p| {
                p.toggle_loop();
                p.is_looping()
            })
            .await;
        tracing::info!(looping, "Loop toggled");
    }

    /// Jump to `seconds`, bounded by the episode length like the slider is.
    pub async fn seek_to(&self, seconds: u64) {
        let model = self.model.lock().await;
        let info = model.get_playback_info().await;
        if !info.controls_enabled() {
            return;
        }

        let position = seconds.min(info.duration());
        if let Err(e) = self.audio_backend.seek(position) {
            tracing::error!(error = %e, "Seek failed");
            model.set_error(Self::format_error(&e)).await;
            return;
        }
        model.set_elapsed(position).await;
        tracing::debug!(position, "Seeked");
    }

    pub async fn seek_forward(&self) {
        let elapsed = self.playback_info().await.elapsed;
        self.seek_to(elapsed.saturating_add(SEEK_STEP_SECS)).await;
    }

    pub async fn seek_backward(&self) {
        let elapsed = self.playback_info().await.elapsed;
        self.seek_to(elapsed.saturating_sub(SEEK_STEP_SECS)).await;
    }
}
