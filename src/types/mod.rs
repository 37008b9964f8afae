//! Core types module

mod config;
mod state;
mod track;

pub use config::{DEFAULT_STREAM_URL, PlayerConfig, PlayerConfigBuilder};
pub use state::{PlaybackState, PlaybackStatus};
pub use track::TrackInfo;
