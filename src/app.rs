//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the library cursor and
//! the view toggles. Playback state is owned by the controller.

mod model;

pub use model::*;
