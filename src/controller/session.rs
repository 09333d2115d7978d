use std::time::Duration;

use crate::catalog::TrackId;

/// Mutable runtime state of "what is selected/playing and where".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSession {
    /// `None` until the first selection.
    pub selected: Option<TrackId>,
    pub is_playing: bool,
    /// Never past `duration`; stays zero while `duration` is unknown.
    pub position: Duration,
    /// `None` until the media primitive reports it.
    pub duration: Option<Duration>,
}

impl PlaybackSession {
    /// Fraction of the track already played, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn is_selected(&self, id: &TrackId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}
