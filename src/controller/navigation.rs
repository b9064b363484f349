//! Episode list and detail page navigation

use super::AppController;

impl AppController {
    pub async fn load_episodes(&self) {
        let model = self.model.lock().await;
        let Some(client) = model.get_episodes_client().await else {
            return;
        };
        model.set_loading(true).await;
        drop(model);

        let result = client
            .list_episodes(self.list_limit, "published_at", self.list_order)
            .await;

        let model = self.model.lock().await;
        match result {
            Ok(episodes) => {
                tracing::info!(count = episodes.len(), "Loaded latest episodes");
                model.set_episodes(episodes).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load episodes");
                model.set_loading(false).await;
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Fetch the selected episode afresh and show its detail page.
    pub async fn open_selected_episode(&self) {
        let model = self.model.lock().await;
        let Some(selected) = model.get_selected_episode().await else {
            return;
        };
        let Some(client) = model.get_episodes_client().await else {
            // No API to ask; the list entry already carries everything.
            model.show_episode_detail(selected).await;
            return;
        };
        model.set_loading(true).await;
        drop(model);

        let result = client.get_episode(&selected.id).await;

        let model = self.model.lock().await;
        match result {
            Ok(episode) => model.show_episode_detail(episode).await,
            Err(e) => {
                tracing::error!(id = %selected.id, error = %e, "Failed to load episode");
                model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Queue the whole list, starting at the highlighted entry.
    pub async fn play_selected_from_list(&self) {
        let (episodes, index) = {
            let model = self.model.lock().await;
            (model.get_episodes().await, model.get_selected_index().await)
        };
        if episodes.is_empty() {
            return;
        }
        self.play_episode_list(episodes, index).await;
    }

    pub async fn play_detail_episode(&self) {
        let episode = self.model.lock().await.get_detail_episode().await;
        if let Some(episode) = episode {
            self.play_episode(episode).await;
        }
    }
}
