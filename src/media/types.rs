//! Media-related small types: load generations, events and backend commands.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Monotonic tag attached to every load. Events carrying an older
/// generation belong to a previous track and are ignored.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Periodic position report.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tick {
    pub generation: Generation,
    pub position: Duration,
    /// `None` while the backend does not know the length of the media.
    pub duration: Option<Duration>,
}

/// Asynchronous notifications delivered by a media primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Tick(Tick),
    /// Playback could not start (unsupported format, missing file, ...).
    Failed {
        generation: Generation,
        reason: String,
    },
    /// The loaded media played to its end.
    Ended { generation: Generation },
}

#[derive(Debug)]
pub(super) enum MediaCmd {
    /// Replace the current media. `duration_hint` is used when the decoder
    /// cannot tell the total length.
    Load {
        source: PathBuf,
        duration_hint: Option<Duration>,
        generation: Generation,
    },
    Play,
    Pause,
    SeekTo(Duration),
    /// Quit the media thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
