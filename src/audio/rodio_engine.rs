//! Audio output through rodio
//!
//! Episodes are downloaded whole before decoding. The bytes are kept so a
//! looped episode can be decoded again from the start.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use super::MediaEngine;

pub struct RodioEngine {
    // Dropping the stream silences every sink created from it.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    http: reqwest::blocking::Client,
    sink: Option<Sink>,
    bytes: Option<Arc<[u8]>>,
}

impl RodioEngine {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("no audio output device")?;
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("podcastr/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            _stream: stream,
            handle,
            http,
            sink: None,
            bytes: None,
        })
    }

    fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>> {
        Decoder::new(Cursor::new(bytes.clone())).context("unsupported audio format")
    }
}

impl MediaEngine for RodioEngine {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn load(&mut self, url: &str, _duration_hint: u64) -> Result<Option<u64>> {
        self.unload();

        tracing::debug!(url, "Downloading episode audio");
        let body = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("failed to fetch {url}"))?
            .bytes()
            .context("failed to read episode audio")?;
        let bytes: Arc<[u8]> = Arc::from(body.as_ref());

        let source = Self::decode(&bytes)?;
        let duration = source.total_duration().map(|d| d.as_secs());

        let sink = Sink::try_new(&self.handle).context("failed to open audio sink")?;
        sink.pause();
        sink.append(source);

        self.sink = Some(sink);
        self.bytes = Some(bytes);
        Ok(duration)
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        sink.try_seek(Duration::from_secs(position))
            .map_err(|e| anyhow::anyhow!("seek to {position}s failed: {e:?}"))
    }

    fn restart(&mut self) -> Result<()> {
        let Some(bytes) = self.bytes.clone() else {
            return Ok(());
        };
        let drained = self.sink.as_ref().is_some_and(|s| s.empty());
        if !drained {
            return self.seek(0);
        }
        if let Some(sink) = &self.sink {
            sink.append(Self::decode(&bytes)?);
        }
        Ok(())
    }

    fn position(&self) -> u64 {
        self.sink.as_ref().map(|s| s.get_pos().as_secs()).unwrap_or(0)
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| s.empty())
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.bytes = None;
    }
}
