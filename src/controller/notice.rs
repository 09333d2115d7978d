use std::fmt;

use crate::catalog::TrackId;

/// Non-fatal message for the rendering layer, e.g. a track that refused to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub track: Option<TrackId>,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.track {
            Some(id) => write!(f, "track {id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
