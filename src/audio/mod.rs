//! Audio module - the media element behind the player panel
//!
//! A `MediaEngine` owns the actual output (or a clock standing in for it) and
//! lives on a dedicated thread, since audio output handles are not `Send`.
//! The controller drives it with `MediaCommand`s and listens for
//! `MediaEvent`s on an unbounded tokio channel, in delivery order. Every load
//! carries a generation number chosen by the caller, and every event echoes
//! the generation of the load it belongs to.
//!
//! - `clock`: silent engine that only advances time
//! - `rodio_engine`: real output through rodio (feature `audio`)

mod clock;
#[cfg(feature = "audio")]
mod rodio_engine;

use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

pub use clock::ClockEngine;
#[cfg(feature = "audio")]
pub use rodio_engine::RodioEngine;

/// How often the engine thread reports the playback position.
const TICK: Duration = Duration::from_millis(250);

/// Commands understood by the engine thread
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaCommand {
    Load { url: String, duration: u64, generation: u64 },
    Play,
    Pause,
    Seek(u64),
    SetLoop(bool),
    Unload,
    Shutdown,
}

/// Notifications coming back from the engine thread
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaEvent {
    MetadataLoaded { generation: u64, duration: Option<u64> },
    TimeUpdate { generation: u64, position: u64 },
    Ended { generation: u64 },
    Failed { generation: u64, error: String },
}

impl MediaEvent {
    /// The load this event belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            MediaEvent::MetadataLoaded { generation, .. }
            | MediaEvent::TimeUpdate { generation, .. }
            | MediaEvent::Ended { generation }
            | MediaEvent::Failed { generation, .. } => *generation,
        }
    }
}

pub type MediaEventChannel = UnboundedReceiver<MediaEvent>;

/// Something that can play one audio resource at a time.
///
/// Positions are whole seconds from the start of the loaded resource.
pub trait MediaEngine {
    fn name(&self) -> &'static str;
    /// Load `url` paused at position 0. Returns the decoded duration when known.
    fn load(&mut self, url: &str, duration_hint: u64) -> Result<Option<u64>>;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: u64) -> Result<()>;
    /// Start the loaded resource over from the beginning.
    fn restart(&mut self) -> Result<()>;
    fn position(&self) -> u64;
    fn is_finished(&self) -> bool;
    fn unload(&mut self);
}

pub struct AudioBackend {
    commands: Sender<MediaCommand>,
    events: Mutex<Option<MediaEventChannel>>,
    engine_name: &'static str,
    thread: Option<JoinHandle<()>>,
}

impl AudioBackend {
    /// Start the engine built by `factory` on its own thread.
    ///
    /// The factory runs on that thread; its error is returned here.
    pub fn spawn<E, F>(factory: F) -> Result<Self>
    where
        E: MediaEngine,
        F: FnOnce() -> Result<E> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = unbounded_channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("media-engine".to_string())
            .spawn(move || match factory() {
                Ok(engine) => {
                    let _ = ready_tx.send(Ok(engine.name()));
                    run_engine(engine, command_rx, event_tx);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .context("failed to spawn media engine thread")?;

        let engine_name = ready_rx
            .recv()
            .context("media engine thread exited during startup")??;

        tracing::info!(engine = engine_name, "Media engine started");

        Ok(Self {
            commands: command_tx,
            events: Mutex::new(Some(event_rx)),
            engine_name,
            thread: Some(thread),
        })
    }

    /// Real audio output when built with it, otherwise the silent clock.
    pub fn new() -> Result<Self> {
        #[cfg(feature = "audio")]
        {
            match Self::spawn(RodioEngine::new) {
                Ok(backend) => return Ok(backend),
                Err(e) => {
                    tracing::warn!(error = %e, "Audio output unavailable, falling back to silent playback");
                }
            }
        }

        Self::spawn(|| Ok(ClockEngine::new()))
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine_name
    }

    /// Hand out the event receiver. Only the first caller gets it.
    pub async fn take_event_channel(&self) -> Option<MediaEventChannel> {
        self.events.lock().await.take()
    }

    pub fn send(&self, command: MediaCommand) -> Result<()> {
        tracing::trace!(?command, "MediaCommand");
        self.commands
            .send(command)
            .map_err(|_| anyhow::anyhow!("media engine is not running"))
    }

    pub fn load(&self, url: &str, duration: u64, generation: u64) -> Result<()> {
        self.send(MediaCommand::Load {
            url: url.to_string(),
            duration,
            generation,
        })
    }

    pub fn play(&self) -> Result<()> {
        self.send(MediaCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(MediaCommand::Pause)
    }

    pub fn seek(&self, position: u64) -> Result<()> {
        self.send(MediaCommand::Seek(position))
    }

    pub fn set_loop(&self, looping: bool) -> Result<()> {
        self.send(MediaCommand::SetLoop(looping))
    }

    pub fn unload(&self) -> Result<()> {
        self.send(MediaCommand::Unload)
    }
}

impl Drop for AudioBackend {
    fn drop(&mut self) {
        let _ = self.commands.send(MediaCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_engine<E: MediaEngine>(
    mut engine: E,
    commands: Receiver<MediaCommand>,
    events: UnboundedSender<MediaEvent>,
) {
    let mut loaded = false;
    let mut playing = false;
    let mut looping = false;
    let mut ended = false;
    let mut last_position: Option<u64> = None;
    let mut generation = 0;

    loop {
        match commands.recv_timeout(TICK) {
            Ok(MediaCommand::Load { url, duration, generation: next }) => {
                generation = next;
                ended = false;
                last_position = None;
                match engine.load(&url, duration) {
                    Ok(decoded) => {
                        loaded = true;
                        tracing::debug!(url = %url, generation, ?decoded, "Media loaded");
                        let _ = events.send(MediaEvent::MetadataLoaded {
                            generation,
                            duration: decoded,
                        });
                        if playing {
                            engine.play();
                        }
                    }
                    Err(e) => {
                        loaded = false;
                        tracing::error!(url = %url, generation, error = %e, "Media load failed");
                        let _ = events.send(MediaEvent::Failed {
                            generation,
                            error: format!("Could not load episode audio: {e:#}"),
                        });
                    }
                }
            }
            Ok(MediaCommand::Play) => {
                playing = true;
                if loaded {
                    if ended {
                        ended = false;
                        if let Err(e) = engine.restart() {
                            tracing::warn!(error = %e, "Restart failed");
                        }
                    }
                    engine.play();
                }
            }
            Ok(MediaCommand::Pause) => {
                playing = false;
                if loaded {
                    engine.pause();
                }
            }
            Ok(MediaCommand::Seek(position)) => {
                if loaded {
                    ended = false;
                    match engine.seek(position) {
                        Ok(()) => last_position = Some(position),
                        Err(e) => tracing::warn!(position, error = %e, "Seek failed"),
                    }
                }
            }
            Ok(MediaCommand::SetLoop(value)) => looping = value,
            Ok(MediaCommand::Unload) => {
                engine.unload();
                loaded = false;
                ended = false;
                last_position = None;
            }
            Ok(MediaCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if !loaded || !playing || ended {
            continue;
        }

        if engine.is_finished() {
            if looping {
                tracing::debug!("Looping current episode");
                if let Err(e) = engine.restart() {
                    tracing::warn!(error = %e, "Restart failed");
                }
                engine.play();
                last_position = None;
            } else {
                ended = true;
                let _ = events.send(MediaEvent::Ended { generation });
            }
            continue;
        }

        let position = engine.position();
        if last_position != Some(position) {
            last_position = Some(position);
            let _ = events.send(MediaEvent::TimeUpdate { generation, position });
        }
    }

    engine.unload();
    tracing::debug!("Media engine thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    /// Engine whose progress is driven from the test.
    #[derive(Clone, Default)]
    struct ScriptedEngine {
        position: Arc<AtomicU64>,
        finished: Arc<AtomicBool>,
        fail_load: bool,
    }

    impl MediaEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn load(&mut self, url: &str, duration_hint: u64) -> Result<Option<u64>> {
            if self.fail_load {
                anyhow::bail!("unreachable host for {url}");
            }
            self.position.store(0, Ordering::SeqCst);
            Ok(Some(duration_hint))
        }

        fn play(&mut self) {}

        fn pause(&mut self) {}

        fn seek(&mut self, position: u64) -> Result<()> {
            self.position.store(position, Ordering::SeqCst);
            Ok(())
        }

        fn restart(&mut self) -> Result<()> {
            self.position.store(0, Ordering::SeqCst);
            self.finished.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn position(&self) -> u64 {
            self.position.load(Ordering::SeqCst)
        }

        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::SeqCst)
        }

        fn unload(&mut self) {}
    }

    async fn next_event(events: &mut MediaEventChannel) -> MediaEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for media event")
            .expect("media event channel closed")
    }

    #[tokio::test]
    async fn load_reports_metadata_then_time_updates() {
        let engine = ScriptedEngine::default();
        let probe = engine.clone();
        let backend = AudioBackend::spawn(move || Ok(engine)).unwrap();
        let mut events = backend.take_event_channel().await.unwrap();

        backend.load("https://example.com/a.mp3", 90, 1).unwrap();
        backend.play().unwrap();
        assert_eq!(next_event(&mut events).await, MediaEvent::MetadataLoaded { generation: 1, duration: Some(90) });
        assert_eq!(next_event(&mut events).await, MediaEvent::TimeUpdate { generation: 1, position: 0 });

        probe.position.store(12, Ordering::SeqCst);
        assert_eq!(next_event(&mut events).await, MediaEvent::TimeUpdate { generation: 1, position: 12 });
    }

    #[tokio::test]
    async fn finished_without_loop_emits_ended_once() {
        let engine = ScriptedEngine::default();
        let probe = engine.clone();
        let backend = AudioBackend::spawn(move || Ok(engine)).unwrap();
        let mut events = backend.take_event_channel().await.unwrap();

        backend.load("https://example.com/a.mp3", 90, 1).unwrap();
        assert!(matches!(next_event(&mut events).await, MediaEvent::MetadataLoaded { .. }));

        probe.finished.store(true, Ordering::SeqCst);
        backend.play().unwrap();
        assert_eq!(next_event(&mut events).await, MediaEvent::Ended { generation: 1 });

        // Nothing else arrives while the episode sits at its end.
        let quiet = tokio::time::timeout(TICK * 4, events.recv()).await;
        assert!(quiet.is_err());
    }

    #[tokio::test]
    async fn loop_restarts_instead_of_ending() {
        let engine = ScriptedEngine::default();
        let probe = engine.clone();
        let backend = AudioBackend::spawn(move || Ok(engine)).unwrap();
        let mut events = backend.take_event_channel().await.unwrap();

        backend.set_loop(true).unwrap();
        backend.load("https://example.com/a.mp3", 90, 1).unwrap();
        assert!(matches!(next_event(&mut events).await, MediaEvent::MetadataLoaded { .. }));
        probe.position.store(89, Ordering::SeqCst);
        backend.play().unwrap();
        assert_eq!(next_event(&mut events).await, MediaEvent::TimeUpdate { generation: 1, position: 89 });

        probe.finished.store(true, Ordering::SeqCst);
        // The restart rewinds to zero and playback carries on.
        assert_eq!(next_event(&mut events).await, MediaEvent::TimeUpdate { generation: 1, position: 0 });
        assert!(!probe.finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failed_load_is_reported() {
        let engine = ScriptedEngine {
            fail_load: true,
            ..Default::default()
        };
        let backend = AudioBackend::spawn(move || Ok(engine)).unwrap();
        let mut events = backend.take_event_channel().await.unwrap();

        backend.load("https://example.com/missing.mp3", 90, 1).unwrap();
        match next_event(&mut events).await {
            MediaEvent::Failed { generation, error } => {
                assert_eq!(generation, 1);
                assert!(error.contains("unreachable host"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn events_carry_the_generation_of_their_load() {
        let backend = AudioBackend::spawn(|| Ok(ScriptedEngine::default())).unwrap();
        let mut events = backend.take_event_channel().await.unwrap();

        backend.load("https://example.com/a.mp3", 90, 1).unwrap();
        backend.load("https://example.com/b.mp3", 60, 2).unwrap();
        backend.play().unwrap();

        assert_eq!(next_event(&mut events).await, MediaEvent::MetadataLoaded { generation: 1, duration: Some(90) });
        assert_eq!(next_event(&mut events).await, MediaEvent::MetadataLoaded { generation: 2, duration: Some(60) });
        assert_eq!(next_event(&mut events).await.generation(), 2);
    }

    #[test]
    fn factory_error_surfaces_from_spawn() {
        let result = AudioBackend::spawn(|| -> Result<ScriptedEngine> { anyhow::bail!("no device") });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn event_channel_is_handed_out_once() {
        let backend = AudioBackend::spawn(|| Ok(ScriptedEngine::default())).unwrap();
        assert!(backend.take_event_channel().await.is_some());
        assert!(backend.take_event_channel().await.is_none());
    }
}
