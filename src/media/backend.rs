use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::error::PlaybackError;

use super::primitive::MediaPrimitive;
use super::thread::spawn_media_thread;
use super::types::{Generation, MediaCmd, MediaEvent};

enum Link {
    Running {
        tx: Sender<MediaCmd>,
        join: Mutex<Option<JoinHandle<()>>>,
    },
    /// No output device; every attempt to play is refused with this reason.
    NoOutput(String),
}

/// `MediaPrimitive` backed by a rodio output stream on a dedicated thread.
pub struct RodioMedia {
    link: Link,
}

impl RodioMedia {
    /// Open the default output device and start the media thread.
    ///
    /// Returns the backend together with the receiving end of its event stream.
    pub fn spawn(settings: &AudioSettings) -> Result<(Self, Receiver<MediaEvent>), PlaybackError> {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

        let handle = spawn_media_thread(
            rx,
            event_tx,
            ready_tx,
            Duration::from_millis(settings.tick_interval_ms.max(1)),
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                let _ = handle.join();
                return Err(PlaybackError::NoOutputDevice(reason));
            }
            Err(_) => return Err(PlaybackError::Disconnected),
        }

        let link = Link::Running {
            tx,
            join: Mutex::new(Some(handle)),
        };
        Ok((Self { link }, event_rx))
    }

    /// Open the output device, or fall back to a backend that refuses to
    /// play so the library stays browsable.
    pub fn spawn_or_silent(settings: &AudioSettings) -> (Self, Receiver<MediaEvent>) {
        match Self::spawn(settings) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("audio output unavailable, playback disabled: {e}");
                let reason = match e {
                    PlaybackError::NoOutputDevice(reason) => reason,
                    other => other.to_string(),
                };
                Self::without_output(reason)
            }
        }
    }

    /// A backend with no output device.
    pub fn without_output(reason: impl Into<String>) -> (Self, Receiver<MediaEvent>) {
        let (_, event_rx) = mpsc::channel::<MediaEvent>();
        let media = Self {
            link: Link::NoOutput(reason.into()),
        };
        (media, event_rx)
    }

    fn send(&self, cmd: MediaCmd) -> Result<(), PlaybackError> {
        match &self.link {
            Link::Running { tx, .. } => tx.send(cmd).map_err(|_| PlaybackError::Disconnected),
            Link::NoOutput(reason) => Err(PlaybackError::NoOutputDevice(reason.clone())),
        }
    }

    /// Fade out, stop the media thread and wait for it to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let Link::Running { tx, join } = &self.link else {
            return;
        };
        let _ = tx.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        if let Ok(mut j) = join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaPrimitive for RodioMedia {
    fn load(
        &mut self,
        source: &Path,
        duration_hint: Option<Duration>,
        generation: Generation,
    ) -> Result<(), PlaybackError> {
        self.send(MediaCmd::Load {
            source: source.to_path_buf(),
            duration_hint,
            generation,
        })
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.send(MediaCmd::Play)
    }

    fn pause(&mut self) {
        if let Err(e) = self.send(MediaCmd::Pause) {
            log::warn!("pause ignored: {e}");
        }
    }

    fn seek_to(&mut self, position: Duration) {
        if let Err(e) = self.send(MediaCmd::SeekTo(position)) {
            log::warn!("seek ignored: {e}");
        }
    }
}
