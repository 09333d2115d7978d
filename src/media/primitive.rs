use std::path::Path;
use std::time::Duration;

use crate::error::PlaybackError;

use super::types::Generation;

/// Capabilities the playback controller needs from the host's media element.
///
/// Commands return quickly; their effects may complete asynchronously and are
/// reported back as `MediaEvent`s tagged with the generation passed to `load`.
pub trait MediaPrimitive {
    /// Replace the current media with `source`.
    fn load(
        &mut self,
        source: &Path,
        duration_hint: Option<Duration>,
        generation: Generation,
    ) -> Result<(), PlaybackError>;

    /// Start or resume playback of the loaded media.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    fn seek_to(&mut self, position: Duration);
}
