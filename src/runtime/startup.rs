use std::path::Path;

use crate::catalog::{self, Catalog, Track};
use crate::config::{self, LibrarySettings};
use crate::controller::PlaybackController;
use crate::error::StartupError;
use crate::media::MediaPrimitive;

/// Build the catalog and describe where it came from.
pub fn build_catalog(
    dir_arg: Option<&str>,
    library: &LibrarySettings,
) -> Result<(Catalog, String), StartupError> {
    let (tracks, origin) = collect_tracks(dir_arg, library)?;
    let catalog = Catalog::load(tracks)?;
    if catalog.is_empty() {
        log::warn!("no tracks found in {origin}");
    }
    Ok((catalog, origin))
}

/// Precedence: directory argument, `library.catalog_file`, inline
/// `library.tracks`, `library.scan_dir`, then the current directory.
fn collect_tracks(
    dir_arg: Option<&str>,
    library: &LibrarySettings,
) -> Result<(Vec<Track>, String), StartupError> {
    if let Some(dir) = dir_arg {
        return Ok((catalog::scan(Path::new(dir), library), dir.to_string()));
    }

    if let Some(path) = &library.catalog_file {
        let tracks = catalog::load_catalog_file(path, library)?;
        return Ok((tracks, path.display().to_string()));
    }

    if !library.tracks.is_empty() {
        let tracks = catalog::tracks_from_entries(&library.tracks, None, library);
        return Ok((tracks, "config".to_string()));
    }

    let dir = library
        .scan_dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| "Music".into());
    Ok((catalog::scan(&dir, library), dir.display().to_string()))
}

/// Apply launch-time playback settings.
pub fn apply_playback_defaults<M: MediaPrimitive>(
    controller: &mut PlaybackController<M>,
    settings: &config::Settings,
) {
    if !settings.playback.autoplay_first {
        return;
    }
    let Some(first) = controller.catalog().get_index(0).map(|t| t.id.clone()) else {
        return;
    };
    if let Err(e) = controller.select(&first) {
        log::error!("autoplay: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TrackDisplayField, TrackEntry};
    use crate::error::CatalogError;
    use std::path::PathBuf;

    fn entry(id: &str) -> TrackEntry {
        TrackEntry {
            id: id.into(),
            title: format!("song {id}"),
            source: PathBuf::from(format!("/music/{id}.mp3")),
            artwork: None,
            artist: None,
            album: None,
        }
    }

    #[test]
    fn directory_argument_wins_over_configured_tracks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.mp3"), b"not real").unwrap();

        let library = LibrarySettings {
            tracks: vec![entry("a"), entry("b")],
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        };
        let (catalog, origin) = build_catalog(dir.path().to_str(), &library).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_index(0).unwrap().display, "one");
        assert_eq!(origin, dir.path().to_str().unwrap());
    }

    #[test]
    fn inline_tracks_are_used_without_directory_or_file() {
        let library = LibrarySettings {
            tracks: vec![entry("a"), entry("b")],
            ..LibrarySettings::default()
        };
        let (catalog, origin) = build_catalog(None, &library).unwrap();
        assert_eq!(origin, "config");
        let ids: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let library = LibrarySettings {
            catalog_file: Some(PathBuf::from("/definitely/not/here.toml")),
            tracks: vec![entry("a")],
            ..LibrarySettings::default()
        };
        assert!(matches!(
            build_catalog(None, &library),
            Err(StartupError::CatalogFileRead { .. })
        ));
    }

    #[test]
    fn duplicate_ids_in_config_are_rejected() {
        let library = LibrarySettings {
            tracks: vec![entry("a"), entry("a")],
            ..LibrarySettings::default()
        };
        assert!(matches!(
            build_catalog(None, &library),
            Err(StartupError::Catalog(CatalogError::InvalidCatalog(_)))
        ));
    }

    #[test]
    fn scan_dir_is_used_as_last_configured_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.ogg"), b"not real").unwrap();

        let library = LibrarySettings {
            scan_dir: Some(dir.path().to_path_buf()),
            ..LibrarySettings::default()
        };
        let (catalog, _) = build_catalog(None, &library).unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
