mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::AudioBackend;
use config::Config;
use controller::AppController;
use model::{AppModel, EpisodesClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Podcastr Starting ===");

    let episodes_client = EpisodesClient::new(&config.api_url)?;
    tracing::info!(api = %episodes_client.base_url(), limit = config.limit, "Episodes API configured");

    let mut app_model = AppModel::new();
    app_model.set_episodes_client(episodes_client);
    let model = Arc::new(Mutex::new(app_model));

    let audio_backend = Arc::new(AudioBackend::new()?);
    tracing::info!(engine = audio_backend.engine_name(), "Audio backend ready");

    let controller = AppController::new(model.clone(), audio_backend.clone(), config.limit, config.order);
    controller.try_start_event_listener().await;

    let controller_for_init = controller.clone();
    tokio::spawn(async move {
        controller_for_init.load_episodes().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    if let Err(e) = audio_backend.unload() {
        tracing::debug!(error = %e, "Media engine already stopped");
    }

    tracing::info!("Podcastr shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Get current state
        let (playback, ui_state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_info().await,
                model_guard.get_ui_state().await,
                model_guard.should_quit().await,
            )
        };

        let today = chrono::Local::now().date_naive();

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, today);
        })?;

        if should_quit {
            break;
        }

        // Short poll keeps the progress bar moving smoothly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
