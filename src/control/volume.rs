//! Listener volume

use serde::{Deserialize, Deserializer};

/// Volume level as an integer percentage (0 = silent, 100 = max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(u8);

impl Volume {
    /// Minimum volume (silent)
    pub const MIN: Self = Self(0);
    /// Maximum volume
    pub const MAX: Self = Self(100);
    /// Default volume (80%)
    pub const DEFAULT: Self = Self(80);

    /// Create a volume from any integer level, clamping to `[0, 100]`
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Value is clamped to 0..=100 first"
    )]
    pub fn clamped(level: i32) -> Self {
        Self(level.clamp(0, 100) as u8)
    }

    /// Create from percentage, clamping values above 100
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// Get as percentage (0 - 100)
    #[must_use]
    pub fn as_percent(self) -> u8 {
        self.0
    }

    /// Get as linear gain (0.0 - 1.0)
    #[must_use]
    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// Check if silent
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 == 0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for Volume {
    fn from(level: i32) -> Self {
        Self::clamped(level)
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Self::clamped)
    }
}
