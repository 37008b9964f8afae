use thiserror::Error;

use crate::audio::AudioOutputError;

/// Errors that can occur while driving a live stream
#[derive(Debug, Error)]
pub enum RadioError {
    // ===== Audio Path =====
    /// The audio output could not start or keep playing the stream
    #[error("connection failed: {0}")]
    Output(#[from] AudioOutputError),

    // ===== Metadata =====
    /// HTTP request to the metadata endpoint failed
    #[cfg(feature = "http")]
    #[error("metadata request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Metadata endpoint answered with a non-success status
    #[error("metadata endpoint returned HTTP {status}")]
    MetadataStatus {
        /// HTTP status code
        status: u16,
    },

    /// Metadata payload could not be decoded
    #[error("malformed metadata payload: {0}")]
    Json(#[from] serde_json::Error),

    // ===== Configuration =====
    /// A configured URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration is inconsistent
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Lifecycle =====
    /// The player task has been torn down
    #[error("player is shut down")]
    PlayerClosed,
}

impl RadioError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error should be shown to the listener
    ///
    /// Only audio-path failures are user-visible; metadata and
    /// configuration problems degrade silently.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// Check if this error is recoverable by retrying
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Output(err) => !matches!(err, AudioOutputError::Closed),
            Self::MetadataStatus { .. } | Self::Json(_) => true,
            #[cfg(feature = "http")]
            Self::Http(_) => true,
            Self::InvalidUrl(_) | Self::Config { .. } | Self::Io(_) | Self::PlayerClosed => false,
        }
    }
}

/// Result type alias for radio operations
pub type Result<T> = std::result::Result<T, RadioError>;
