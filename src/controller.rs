//! Playback-state controller.
//!
//! Keeps the selected track, the transport state, the position and the
//! duration consistent while user intents and media events arrive. The
//! controller is the only writer of [`PlaybackSession`]; renderers read it
//! through [`PlaybackController::snapshot`].

mod model;
mod notice;
mod session;

pub use model::PlaybackController;
pub use notice::Notice;
pub use session::PlaybackSession;
