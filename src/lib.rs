//! # liveradio
//!
//! Playback control for a single live internet radio stream.
//!
//! ## Features
//!
//! - Play/stop toggle that always reconnects at the live edge
//! - Volume and mute with restore
//! - Automatic reload when the stream stalls
//! - Now-playing metadata polled from an Icecast-style JSON endpoint
//!
//! ## Example
//!
//! ```rust,no_run
//! use liveradio::testing::MockOutput;
//! use liveradio::{PlaybackStatus, PlayerConfig, RadioPlayer};
//!
//! # async fn example() -> Result<(), liveradio::RadioError> {
//! let config = PlayerConfig::from_file("radio.json")?;
//! let (output, _handle) = MockOutput::new();
//! let player = RadioPlayer::spawn_with_http(&config, output)?;
//!
//! if player.toggle_play().await? == PlaybackStatus::Connecting {
//!     let mut state = player.subscribe();
//!     state.wait_for(|s| s.status != PlaybackStatus::Connecting).await.ok();
//! }
//! println!("{}", player.state().status);
//!
//! player.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **High-level**: `RadioPlayer` - actor task owning everything below
//! - **Mid-level**: `PlaybackController` and `MetadataPoller`
//! - **Low-level**: the `AudioOutput` and `MetadataSource` seams

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod audio;
pub mod control;
/// Error types
pub mod error;
pub mod metadata;
/// State management
pub mod state;
/// Stream location handling
pub mod streaming;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

// Internal modules
mod player;

// Re-exports
pub use audio::{
    AudioOutput, AudioOutputError, OutputEvent, OutputEvents, OutputReport, SourceId,
};
pub use control::volume::Volume;
pub use control::{AttemptId, PlayAttempt, PlaybackController};
pub use error::{RadioError, Result};
#[cfg(feature = "http")]
pub use metadata::HttpMetadataSource;
pub use metadata::{MetadataPoller, MetadataSource};
pub use player::RadioPlayer;
pub use state::{EventBus, PlayerEvent};
pub use types::{PlaybackState, PlaybackStatus, PlayerConfig, TrackInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        AudioOutput, MetadataSource, PlaybackState, PlaybackStatus, PlayerConfig, RadioError,
        RadioPlayer, TrackInfo, Volume,
    };
}
