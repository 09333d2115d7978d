//! Error types shared by the catalog, the media backend, settings and startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::TrackId;

/// Failures raised by catalog construction and lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two tracks share the same id. Fatal at startup.
    #[error("invalid catalog: duplicate track id `{0}`")]
    InvalidCatalog(TrackId),

    /// Lookup of an id that is not part of the catalog.
    #[error("track `{0}` not found in catalog")]
    NotFound(TrackId),

    /// Neighbor navigation on a catalog with zero entries.
    #[error("catalog is empty")]
    EmptyCatalog,
}

/// Failures reported by a media primitive when it cannot start playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The backend thread is gone (quit or crashed).
    #[error("media backend is not running")]
    Disconnected,

    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
}

/// Failures while loading `config.toml` and the environment overrides.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures while assembling the catalog from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot read catalog file {path:?}: {source}")]
    CatalogFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse catalog file {path:?}: {source}")]
    CatalogFileParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
