use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::OutputStreamBuilder;

use super::sink::{
    MediaSink, RodioOutput, SinkOpener, effective_duration, fade_out_sink, reported_position,
};
use super::types::{Generation, MediaCmd, MediaEvent, Tick};

/// What the last `Load` asked for, kept even when opening failed so a later
/// `Play` can retry it.
#[derive(Debug, Clone)]
struct Request {
    source: PathBuf,
    generation: Generation,
    duration_hint: Option<Duration>,
}

/// Media currently owned by the thread.
struct Loaded<S> {
    sink: S,
    duration: Option<Duration>,
    /// Added to `sink.get_pos()` after a sink had to be rebuilt to seek.
    offset: Duration,
    paused: bool,
    ended: bool,
}

impl<S: MediaSink> Loaded<S> {
    fn position(&self) -> Duration {
        reported_position(self.offset, self.sink.get_pos(), self.duration)
    }
}

pub(super) struct MediaThread<O: SinkOpener> {
    output: O,
    events: Sender<MediaEvent>,
    request: Option<Request>,
    loaded: Option<Loaded<O::Sink>>,
}

impl<O: SinkOpener> MediaThread<O> {
    pub(super) fn new(output: O, events: Sender<MediaEvent>) -> Self {
        Self {
            output,
            events,
            request: None,
            loaded: None,
        }
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver only goes away on shutdown.
        let _ = self.events.send(event);
    }

    fn fail(&self, generation: Generation, reason: String) {
        log::warn!("media {generation} failed: {reason}");
        self.emit(MediaEvent::Failed { generation, reason });
    }

    fn tick(&self) {
        let (Some(request), Some(loaded)) = (&self.request, &self.loaded) else {
            return;
        };
        self.emit(MediaEvent::Tick(Tick {
            generation: request.generation,
            position: loaded.position(),
            duration: loaded.duration,
        }));
    }

    /// Open the current request from `start_at`. On failure nothing stays
    /// loaded and `Failed` is emitted.
    fn open(&mut self, start_at: Duration) -> bool {
        let Some(request) = self.request.clone() else {
            return false;
        };
        if let Some(old) = self.loaded.take() {
            old.sink.stop();
        }

        match self.output.open_at(&request.source, start_at) {
            Ok((sink, decoded)) => {
                let duration = effective_duration(decoded, request.duration_hint);
                log::debug!(
                    "opened {} as {} (duration {:?})",
                    request.source.display(),
                    request.generation,
                    duration
                );
                self.loaded = Some(Loaded {
                    sink,
                    duration,
                    offset: start_at,
                    paused: true,
                    ended: false,
                });
                true
            }
            Err(e) => {
                self.fail(request.generation, e.to_string());
                false
            }
        }
    }

    pub(super) fn load(
        &mut self,
        source: PathBuf,
        duration_hint: Option<Duration>,
        generation: Generation,
    ) {
        self.request = Some(Request {
            source,
            generation,
            duration_hint,
        });
        self.open(Duration::ZERO);
    }

    pub(super) fn play(&mut self) {
        // Like a media element, playing after the end restarts from the top,
        // and playing media that failed to open tries again.
        let reopen = match &self.loaded {
            Some(loaded) => loaded.ended,
            None => true,
        };
        if reopen && !self.open(Duration::ZERO) {
            return;
        }

        if let Some(loaded) = self.loaded.as_mut() {
            loaded.sink.play();
            loaded.paused = false;
        }
    }

    pub(super) fn pause(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.sink.pause();
            loaded.paused = true;
        }
    }

    pub(super) fn seek_to(&mut self, target: Duration) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };

        // A drained sink accepts a seek without moving, so it is rebuilt instead.
        let seeked = if loaded.ended || loaded.sink.empty() {
            false
        } else {
            match loaded.sink.try_seek(target) {
                Ok(()) => {
                    loaded.offset = Duration::ZERO;
                    true
                }
                Err(e) => {
                    log::debug!("seek not supported by decoder ({e}), rebuilding sink");
                    false
                }
            }
        };

        if !seeked {
            let resume = !loaded.paused;
            if !self.open(target) {
                return;
            }
            if let Some(loaded) = self.loaded.as_mut() {
                if resume {
                    loaded.sink.play();
                    loaded.paused = false;
                }
            }
        }
        self.tick();
    }

    /// Periodic work: report position and detect the end of the media.
    pub(super) fn on_timeout(&mut self) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        if loaded.ended {
            return;
        }

        if !loaded.paused && loaded.sink.empty() {
            loaded.ended = true;
            loaded.paused = true;
            // A drained sink reports no useful position; pin it to the end.
            if let Some(d) = loaded.duration {
                loaded.offset = d;
            }
            if let Some(request) = &self.request {
                self.emit(MediaEvent::Ended {
                    generation: request.generation,
                });
            }
            return;
        }
        self.tick();
    }

    pub(super) fn quit(&mut self, fade_out_ms: u64) {
        if let Some(loaded) = self.loaded.take() {
            if !loaded.paused {
                // Fade out gently before stopping.
                fade_out_sink(&loaded.sink, fade_out_ms);
            }
            loaded.sink.stop();
        }
    }

    /// Apply one command. Returns `false` once the thread should exit.
    pub(super) fn handle(&mut self, cmd: MediaCmd) -> bool {
        match cmd {
            MediaCmd::Load {
                source,
                duration_hint,
                generation,
            } => self.load(source, duration_hint, generation),
            MediaCmd::Play => self.play(),
            MediaCmd::Pause => self.pause(),
            MediaCmd::SeekTo(target) => self.seek_to(target),
            MediaCmd::Quit { fade_out_ms } => {
                self.quit(fade_out_ms);
                return false;
            }
        }
        true
    }
}

/// Spawn the media thread. The first message on `ready` tells whether an
/// output device could be opened.
pub(super) fn spawn_media_thread(
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
    ready: SyncSender<Result<(), String>>,
    tick_interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut state = MediaThread::new(RodioOutput::new(stream), events);
        loop {
            match rx.recv_timeout(tick_interval) {
                Ok(cmd) => {
                    if !state.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => state.on_timeout(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
