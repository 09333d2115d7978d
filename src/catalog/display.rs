use std::path::Path;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, path) in the
/// configured order and falls back to `title` when no parts were produced.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    fn non_blank(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|s| !s.is_empty())
    }

    let parts: Vec<String> = fields
        .iter()
        .flat_map(|f| -> Vec<String> {
            match f {
                TrackDisplayField::Display => non_blank(artist)
                    .into_iter()
                    .chain(non_blank(Some(title)))
                    .map(str::to_string)
                    .collect(),
                TrackDisplayField::Title => non_blank(Some(title))
                    .map(str::to_string)
                    .into_iter()
                    .collect(),
                TrackDisplayField::Artist => {
                    non_blank(artist).map(str::to_string).into_iter().collect()
                }
                TrackDisplayField::Album => {
                    non_blank(album).map(str::to_string).into_iter().collect()
                }
                TrackDisplayField::Filename => non_blank(path.file_stem().and_then(|s| s.to_str()))
                    .map(str::to_string)
                    .into_iter()
                    .collect(),
                TrackDisplayField::Path => vec![path.display().to_string()],
            }
        })
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
