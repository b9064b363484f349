//! Media engine event listener

use crate::audio::{MediaEvent, MediaEventChannel};
use crate::model::AppModel;
use super::AppController;

impl AppController {
    pub fn start_media_event_listener(&self, mut event_channel: MediaEventChannel) {
        let controller = self.clone();
        tracing::info!("Starting media event listener");

        tokio::spawn(async move {
            while let Some(event) = event_channel.recv().await {
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Media event listener shutting down");
                    break;
                }
                controller.handle_media_event(event).await;
            }
        });
    }

    pub async fn handle_media_event(&self, event: MediaEvent) {
        // Loads only change under the model lock, so the generation check
        // below stays valid until the event is handled.
        let model = self.model.lock().await;
        if !self.media_sync.lock().await.is_current(event.generation()) {
            tracing::debug!(?event, "Dropping media event from an earlier load");
            return;
        }

        match event {
            MediaEvent::MetadataLoaded { duration, .. } => {
                tracing::debug!(?duration, "MediaEvent::MetadataLoaded");
                if let Err(e) = self.audio_backend.seek(0) {
                    tracing::warn!(error = %e, "Could not rewind after load");
                }
                model.set_elapsed(0).await;
            }
            MediaEvent::TimeUpdate { position, .. } => {
                tracing::trace!(position, "MediaEvent::TimeUpdate");
                model.set_elapsed(position).await;
            }
            MediaEvent::Ended { .. } => {
                tracing::debug!("MediaEvent::Ended");
                self.handle_episode_ended(&model).await;
            }
            MediaEvent::Failed { error, .. } => {
                tracing::error!(error = %error, "MediaEvent::Failed");
                self.media_sync.lock().await.forget_load();
                model.update_player(|p| p.set_playing_state(false)).await;
                model.set_error(error).await;
            }
        }
    }

    /// Move on to the next episode, or drop the queue when there is none.
    async fn handle_episode_ended(&self, model: &AppModel) {
        let advanced = self
            .transition_locked(model, true, |p| {
                if p.has_next() {
                    p.play_next();
                    true
                } else {
                    p.clear();
                    false
                }
            })
            .await;

        if advanced {
            tracing::info!("Episode ended, playing next");
        } else {
            tracing::info!("Episode ended, queue finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use crate::audio::{AudioBackend, ClockEngine, MediaEvent};
    use crate::controller::AppController;
    use crate::model::{AppModel, Episode, SortOrder};

    fn episode(id: &str, duration: u64) -> Episode {
        Episode {
            id: id.to_string(),
            title: format!("Episode {id}"),
            members: "Host".to_string(),
            thumbnail: String::new(),
            url: format!("https://example.com/{id}.mp3"),
            duration,
            published_at: "8 Jan 21".to_string(),
            duration_as_string: crate::model::duration_to_string(duration),
            description: String::new(),
        }
    }

    fn controller() -> AppController {
        let backend = AudioBackend::spawn(|| Ok(ClockEngine::new())).unwrap();
        AppController::new(Arc::new(Mutex::new(AppModel::new())), Arc::new(backend), 12, SortOrder::Desc)
    }

    async fn generation(controller: &AppController) -> u64 {
        controller.media_sync.lock().await.generation
    }

    async fn loaded_url(controller: &AppController) -> Option<String> {
        controller.media_sync.lock().await.loaded_url.clone()
    }

    #[tokio::test]
    async fn ended_with_next_advances() {
        let controller = controller();
        controller
            .play_episode_list(vec![episode("a", 600), episode("b", 600)], 0)
            .await;

        let current = generation(&controller).await;
        controller.handle_media_event(MediaEvent::Ended { generation: current }).await;

        let info = controller.playback_info().await;
        assert_eq!(info.episode.map(|e| e.id), Some("b".to_string()));
        assert!(info.is_playing);
        assert_eq!(generation(&controller).await, current + 1);
    }

    #[tokio::test]
    async fn ended_on_last_episode_clears_queue() {
        let controller = controller();
        controller
            .play_episode_list(vec![episode("a", 600), episode("b", 600)], 1)
            .await;

        let current = generation(&controller).await;
        controller.handle_media_event(MediaEvent::Ended { generation: current }).await;

        let info = controller.playback_info().await;
        assert!(info.episode.is_none());
        assert_eq!(info.queue_len, 0);
        assert_eq!(info.elapsed, 0);
        assert_eq!(loaded_url(&controller).await, None);
    }

    #[tokio::test]
    async fn time_updates_mirror_into_elapsed() {
        let controller = controller();
        controller.play_episode(episode("a", 600)).await;
        let current = generation(&controller).await;

        controller
            .handle_media_event(MediaEvent::TimeUpdate { generation: current, position: 42 })
            .await;
        assert_eq!(controller.playback_info().await.elapsed, 42);

        controller
            .handle_media_event(MediaEvent::MetadataLoaded { generation: current, duration: Some(600) })
            .await;
        assert_eq!(controller.playback_info().await.elapsed, 0);
    }

    #[tokio::test]
    async fn failure_pauses_and_reports() {
        let controller = controller();
        controller.play_episode(episode("a", 600)).await;
        let current = generation(&controller).await;

        controller
            .handle_media_event(MediaEvent::Failed {
                generation: current,
                error: "Could not load episode audio".to_string(),
            })
            .await;

        assert!(!controller.playback_info().await.is_playing);
        let ui = controller.model.lock().await.get_ui_state().await;
        assert_eq!(ui.error_message.as_deref(), Some("Could not load episode audio"));
    }

    #[tokio::test]
    async fn failed_episode_is_loaded_again_on_retry() {
        let controller = controller();
        let a = episode("a", 600);
        controller.play_episode(a.clone()).await;
        let first = generation(&controller).await;

        controller
            .handle_media_event(MediaEvent::Failed {
                generation: first,
                error: "Could not load episode audio".to_string(),
            })
            .await;
        assert_eq!(loaded_url(&controller).await, None);

        // Playing the same episode again sends a fresh load.
        controller.play_episode(a.clone()).await;
        assert_eq!(generation(&controller).await, first + 1);
        assert_eq!(loaded_url(&controller).await, Some(a.url.clone()));
        assert!(controller.playback_info().await.is_playing);

        // So does resuming with the play key after another failure.
        controller
            .handle_media_event(MediaEvent::Failed {
                generation: first + 1,
                error: "Could not load episode audio".to_string(),
            })
            .await;
        controller.toggle_playback().await;
        assert_eq!(generation(&controller).await, first + 2);
        assert_eq!(loaded_url(&controller).await, Some(a.url));
        assert!(controller.playback_info().await.is_playing);
    }

    #[tokio::test]
    async fn events_from_a_replaced_load_are_ignored() {
        let controller = controller();
        controller
            .play_episode_list(vec![episode("a", 600), episode("b", 600)], 0)
            .await;
        let stale = generation(&controller).await;
        controller.next_episode().await;
        controller.model.lock().await.set_elapsed(7).await;

        controller
            .handle_media_event(MediaEvent::Failed {
                generation: stale,
                error: "Could not load episode audio".to_string(),
            })
            .await;
        controller
            .handle_media_event(MediaEvent::TimeUpdate { generation: stale, position: 99 })
            .await;
        controller.handle_media_event(MediaEvent::Ended { generation: stale }).await;

        let info = controller.playback_info().await;
        assert_eq!(info.episode.map(|e| e.id), Some("b".to_string()));
        assert!(info.is_playing);
        assert_eq!(info.elapsed, 7);
        let ui = controller.model.lock().await.get_ui_state().await;
        assert!(ui.error_message.is_none());
    }

    #[tokio::test]
    async fn events_after_unload_are_ignored() {
        let controller = controller();
        controller.play_episode(episode("a", 600)).await;
        let current = generation(&controller).await;
        controller.transition(false, |p| p.clear()).await;

        controller.handle_media_event(MediaEvent::Ended { generation: current }).await;
        controller
            .handle_media_event(MediaEvent::TimeUpdate { generation: current, position: 30 })
            .await;

        let info = controller.playback_info().await;
        assert_eq!(info.queue_len, 0);
        assert_eq!(info.elapsed, 0);
    }
}
