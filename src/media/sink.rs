//! Utilities for creating `rodio` sinks from media sources.
//!
//! The media thread talks to its output through [`SinkOpener`] and
//! [`MediaSink`]; [`RodioOutput`] is the real device, tests plug in a fake.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// One playing (or paused) source on the output.
pub(super) trait MediaSink {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    /// Nothing left to play.
    fn empty(&self) -> bool;
    /// Position inside the appended source.
    fn get_pos(&self) -> Duration;
    fn try_seek(&self, pos: Duration) -> Result<(), String>;
    fn volume(&self) -> f32;
    fn set_volume(&self, volume: f32);
}

/// Opens media sources as paused sinks.
pub(super) trait SinkOpener {
    type Sink: MediaSink;

    /// Open `source` and return a paused sink that starts at `start_at`,
    /// together with the decoder's total duration when it knows it.
    fn open_at(
        &self,
        source: &Path,
        start_at: Duration,
    ) -> Result<(Self::Sink, Option<Duration>), PlaybackError>;
}

impl MediaSink for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn empty(&self) -> bool {
        Sink::empty(self)
    }

    fn get_pos(&self) -> Duration {
        Sink::get_pos(self)
    }

    fn try_seek(&self, pos: Duration) -> Result<(), String> {
        Sink::try_seek(self, pos).map_err(|e| e.to_string())
    }

    fn volume(&self) -> f32 {
        Sink::volume(self)
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume);
    }
}

/// The default output device.
pub(super) struct RodioOutput {
    stream: OutputStream,
}

impl RodioOutput {
    pub(super) fn new(stream: OutputStream) -> Self {
        Self { stream }
    }
}

impl SinkOpener for RodioOutput {
    type Sink = Sink;

    fn open_at(
        &self,
        source: &Path,
        start_at: Duration,
    ) -> Result<(Sink, Option<Duration>), PlaybackError> {
        let file = File::open(source).map_err(|e| PlaybackError::Open {
            path: source.to_path_buf(),
            source: e,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;

        let total = decoder.total_duration();
        let sink = Sink::connect_new(self.stream.mixer());
        // `skip_duration` is the fallback seeking primitive; Duration::ZERO is a no-op.
        sink.append(decoder.skip_duration(start_at));
        sink.pause();
        Ok((sink, total))
    }
}

/// Prefer what the decoder reports, then the tag hint. Zero means unknown.
pub(super) fn effective_duration(
    decoded: Option<Duration>,
    hint: Option<Duration>,
) -> Option<Duration> {
    decoded.or(hint).filter(|d| !d.is_zero())
}

/// Position to report: sink position shifted by any rebuild offset, never
/// past the known duration.
pub(super) fn reported_position(
    offset: Duration,
    sink_pos: Duration,
    duration: Option<Duration>,
) -> Duration {
    let pos = offset + sink_pos;
    match duration {
        Some(d) => pos.min(d),
        None => pos,
    }
}

/// Split a fade of `fade_out_ms` into `(steps, step_ms)`.
pub(super) fn fade_schedule(fade_out_ms: u64) -> (u64, u64) {
    const STEPS: u64 = 20;
    (STEPS, (fade_out_ms / STEPS).max(1))
}

pub(super) fn fade_out_sink<S: MediaSink>(sink: &S, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }

    let (steps, step_ms) = fade_schedule(fade_out_ms);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        std::thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
