use super::track::TrackInfo;
use crate::control::volume::Volume;

/// Listener-facing playback status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    /// Nothing attached, not playing
    #[default]
    Idle,
    /// A play attempt (or stall recovery) is in flight
    Connecting,
    /// The output confirmed playback
    Playing,
    /// The last attempt failed; toggling retries
    Error,
}

impl PlaybackStatus {
    /// Check if a play attempt may be started from this status
    #[must_use]
    pub fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Error)
    }

    /// Check if the output is attached and expected to produce audio
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Playing)
    }

    /// Short label for display
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Connecting => "CONNECTING",
            Self::Playing => "LIVE",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of the player as seen by a presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Current status
    pub status: PlaybackStatus,

    /// Current volume, kept across play/pause cycles
    pub volume: Volume,

    /// Currently playing track (station placeholder until metadata arrives)
    pub now_playing: TrackInfo,

    /// Message of the most recent audio failure, cleared on the next attempt
    pub last_error: Option<String>,
}

impl PlaybackState {
    /// Create the initial state
    #[must_use]
    pub fn new(volume: Volume, placeholder: TrackInfo) -> Self {
        Self {
            status: PlaybackStatus::Idle,
            volume,
            now_playing: placeholder,
            last_error: None,
        }
    }

    /// Whether audio is playing
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}
