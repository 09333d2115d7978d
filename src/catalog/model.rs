use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Stable identifier of a track within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One playable item.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Locator of the playable media.
    pub source: PathBuf,
    /// Locator of a display image, if any.
    pub artwork: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration hint from tags; the media backend reports the real one.
    pub duration: Option<Duration>,
    /// Precomputed list line.
    pub display: String,
}

impl Track {
    /// Build a track with only the required fields; `display` mirrors `title`.
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        source: impl Into<PathBuf>,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            display: title.clone(),
            title,
            source: source.into(),
            artwork: None,
            artist: None,
            album: None,
            duration: None,
        }
    }
}

/// Direction of index-wise navigation through the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}
