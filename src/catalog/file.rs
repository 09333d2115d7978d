use std::path::Path;

use serde::Deserialize;

use crate::config::{LibrarySettings, TrackEntry};
use crate::error::StartupError;

use super::display::display_from_fields;
use super::model::Track;
use super::scan::probe_duration;

/// On-disk layout of a standalone catalog file: a list of `[[tracks]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<TrackEntry>,
}

/// Turn literal track entries into catalog tracks.
///
/// Relative sources are resolved against `base`, when given.
pub fn tracks_from_entries(
    entries: &[TrackEntry],
    base: Option<&Path>,
    settings: &LibrarySettings,
) -> Vec<Track> {
    entries
        .iter()
        .map(|e| {
            let source = match base {
                Some(base) if e.source.is_relative() => base.join(&e.source),
                _ => e.source.clone(),
            };
            let display = display_from_fields(
                &source,
                &e.title,
                e.artist.as_deref(),
                e.album.as_deref(),
                &settings.display_fields,
                &settings.display_separator,
            );
            let duration = probe_duration(&source);
            Track {
                id: e.id.clone(),
                title: e.title.clone(),
                source,
                artwork: e.artwork.clone(),
                artist: e.artist.clone(),
                album: e.album.clone(),
                duration,
                display,
            }
        })
        .collect()
}

/// Read a TOML catalog file. Sources are resolved relative to the file's directory.
pub fn load_catalog_file(
    path: &Path,
    settings: &LibrarySettings,
) -> Result<Vec<Track>, StartupError> {
    let text = std::fs::read_to_string(path).map_err(|source| StartupError::CatalogFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = toml::from_str(&text).map_err(|source| StartupError::CatalogFileParse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(tracks_from_entries(&file.tracks, path.parent(), settings))
}
