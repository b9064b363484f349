//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::Page;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            model.set_should_quit(true).await;
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        let ui_state = model.get_ui_state().await;

        // Page specific keys
        match (&ui_state.page, key.code) {
            (Page::EpisodeList, KeyCode::Enter) => {
                drop(model);
                self.play_selected_from_list().await;
                return Ok(());
            }
            (Page::EpisodeList, KeyCode::Char('o') | KeyCode::Char('O')) => {
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.open_selected_episode().await;
                });
                return Ok(());
            }
            (Page::EpisodeDetail(_), KeyCode::Enter) => {
                drop(model);
                self.play_detail_episode().await;
                return Ok(());
            }
            (Page::EpisodeDetail(_), KeyCode::Esc | KeyCode::Backspace) => {
                model.navigate_back().await;
                return Ok(());
            }
            _ => {}
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            // Next episode
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_episode().await;
            }
            // Previous episode
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_episode().await;
            }
            // Toggle shuffle
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.toggle_shuffle().await;
            }
            // Toggle loop
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.toggle_loop().await;
            }
            // Seek
            KeyCode::Right => {
                drop(model);
                self.seek_forward().await;
            }
            KeyCode::Left => {
                drop(model);
                self.seek_backward().await;
            }
            // Reload the episode list
            KeyCode::F(5) => {
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.load_episodes().await;
                });
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
