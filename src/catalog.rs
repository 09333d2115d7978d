//! Track catalog: the fixed, ordered list of playable tracks.
//!
//! The catalog is built once at startup (from a literal track list or a
//! directory scan) and is read-only afterwards.

mod display;
mod file;
mod model;
mod scan;
mod store;

pub use file::{load_catalog_file, tracks_from_entries};
pub use model::{Direction, Track, TrackId};
pub use scan::scan;
pub use store::Catalog;
