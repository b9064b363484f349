//! Silent engine that only keeps time
//!
//! Used when no audio output is compiled in or available. It honours the
//! episode duration reported by the API so the panel, seeking and the
//! end-of-episode transition all behave as with real output.

use anyhow::Result;
use std::time::{Duration, Instant};

use super::MediaEngine;

#[derive(Debug, Default)]
pub struct ClockEngine {
    duration: Duration,
    offset: Duration,
    started: Option<Instant>,
    loaded: bool,
}

impl ClockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn elapsed(&self) -> Duration {
        let running = self.started.map(|s| s.elapsed()).unwrap_or_default();
        (self.offset + running).min(self.duration)
    }
}

impl MediaEngine for ClockEngine {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn load(&mut self, _url: &str, duration_hint: u64) -> Result<Option<u64>> {
        self.duration = Duration::from_secs(duration_hint);
        self.offset = Duration::ZERO;
        self.started = None;
        self.loaded = true;
        Ok(Some(duration_hint))
    }

    fn play(&mut self) {
        if self.loaded && self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.offset = (self.offset + started.elapsed()).min(self.duration);
        }
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.offset = Duration::from_secs(position).min(self.duration);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<()> {
        self.seek(0)
    }

    fn position(&self) -> u64 {
        self.elapsed().as_secs()
    }

    fn is_finished(&self) -> bool {
        self.loaded && self.elapsed() >= self.duration
    }

    fn unload(&mut self) {
        *self = Self::default();
    }
}
