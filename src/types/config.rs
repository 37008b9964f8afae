use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::track::TrackInfo;
use crate::control::volume::Volume;
use crate::error::{RadioError, Result};

/// Live stream of Web Rádio Figueiró
pub const DEFAULT_STREAM_URL: &str = "https://rs2.ptservidor.com/proxy/orlando?mp=/stream?type=.mp3";

/// Configuration for the live-stream player
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Base URL of the playable stream, without cache-busting
    pub stream_url: String,

    /// Now-playing metadata endpoint (None = no polling)
    pub metadata_url: Option<String>,

    /// Interval between metadata polls (default: 20 seconds)
    #[serde(rename = "poll_interval_secs", deserialize_with = "secs::deserialize")]
    pub poll_interval: Duration,

    /// Timeout for a single metadata request (default: 10 seconds)
    #[serde(rename = "request_timeout_secs", deserialize_with = "secs::deserialize")]
    pub request_timeout: Duration,

    /// Initial volume (default: 80%)
    pub default_volume: Volume,

    /// Station identity shown until metadata arrives; its artist is also
    /// used for titles without an artist
    pub placeholder: TrackInfo,

    /// Query parameter appended to defeat caching of stale connections
    pub cache_bust_param: String,

    /// Capacity of the player command channel (default: 32)
    pub command_buffer: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stream_url: DEFAULT_STREAM_URL.to_string(),
            metadata_url: None,
            poll_interval: Duration::from_secs(20),
            request_timeout: Duration::from_secs(10),
            default_volume: Volume::DEFAULT,
            placeholder: TrackInfo::new("Web Rádio", "Figueiró • Portugal"),
            cache_bust_param: "nocache".to_string(),
            command_buffer: 32,
        }
    }
}

impl PlayerConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration document
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed or fails validation
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded player configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Check the configuration for consistency
    ///
    /// # Errors
    ///
    /// Returns error if a URL does not parse or a value is out of range
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.stream_url)?;
        if let Some(metadata_url) = &self.metadata_url {
            Url::parse(metadata_url)?;
        }
        if self.poll_interval.is_zero() {
            return Err(RadioError::config("poll interval must be non-zero"));
        }
        if self.cache_bust_param.trim().is_empty() {
            return Err(RadioError::config("cache-busting parameter must not be empty"));
        }
        if self.command_buffer == 0 {
            return Err(RadioError::config("command buffer must hold at least one command"));
        }
        Ok(())
    }
}

/// Builder for `PlayerConfig`
#[derive(Debug, Clone, Default)]
pub struct PlayerConfigBuilder {
    config: PlayerConfig,
}

impl PlayerConfigBuilder {
    /// Set stream base URL
    #[must_use]
    pub fn stream_url(mut self, url: impl Into<String>) -> Self {
        self.config.stream_url = url.into();
        self
    }

    /// Set metadata endpoint
    #[must_use]
    pub fn metadata_url(mut self, url: impl Into<String>) -> Self {
        self.config.metadata_url = Some(url.into());
        self
    }

    /// Set metadata polling interval
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set metadata request timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set initial volume
    #[must_use]
    pub fn default_volume(mut self, volume: Volume) -> Self {
        self.config.default_volume = volume;
        self
    }

    /// Set station placeholder track
    #[must_use]
    pub fn placeholder(mut self, placeholder: TrackInfo) -> Self {
        self.config.placeholder = placeholder;
        self
    }

    /// Set cache-busting query parameter name
    #[must_use]
    pub fn cache_bust_param(mut self, param: impl Into<String>) -> Self {
        self.config.cache_bust_param = param.into();
        self
    }

    /// Set command channel capacity
    #[must_use]
    pub fn command_buffer(mut self, capacity: usize) -> Self {
        self.config.command_buffer = capacity;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if validation fails
    pub fn build(self) -> Result<PlayerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Durations expressed as (fractional) seconds
mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, de::Error};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
