//! Media playback primitive: the trait the controller drives and the
//! rodio-backed implementation used by the terminal player.
//!
//! The backend runs on its own thread. Commands go in over a channel and
//! position reports, failures and end-of-media notifications come back as
//! [`MediaEvent`]s tagged with the load generation they belong to.

mod backend;
mod primitive;
mod sink;
mod thread;
mod types;

pub use backend::RodioMedia;
pub use primitive::MediaPrimitive;
pub use types::{Generation, MediaEvent, Tick};

#[cfg(test)]
mod tests;
