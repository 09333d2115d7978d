use std::collections::HashMap;

use crate::error::CatalogError;

use super::model::{Direction, Track, TrackId};

/// Immutable ordered set of tracks with unique ids.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    by_id: HashMap<TrackId, usize>,
}

impl Catalog {
    /// Build a catalog from `tracks`, rejecting duplicate ids.
    pub fn load(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(tracks.len());
        for (i, track) in tracks.iter().enumerate() {
            if by_id.insert(track.id.clone(), i).is_some() {
                return Err(CatalogError::InvalidCatalog(track.id.clone()));
            }
        }
        Ok(Self { tracks, by_id })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Position of `id` in catalog order.
    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn get_index(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn get(&self, id: &TrackId) -> Result<&Track, CatalogError> {
        self.index_of(id)
            .map(|i| &self.tracks[i])
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Return the track adjacent to `id`, wrapping around at either end.
    pub fn neighbor(&self, id: &TrackId, direction: Direction) -> Result<&Track, CatalogError> {
        if self.tracks.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let len = self.tracks.len();
        let pos = self
            .index_of(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let target = match direction {
            Direction::Next => (pos + 1) % len,
            Direction::Prev if pos == 0 => len - 1,
            Direction::Prev => pos - 1,
        };
        Ok(&self.tracks[target])
    }
}
