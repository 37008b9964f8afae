//! Playback control module

pub mod playback;
pub mod volume;

#[cfg(test)]
mod tests;

pub use playback::{AttemptId, AttemptKind, PlayAttempt, PlaybackController};
pub use volume::Volume;
