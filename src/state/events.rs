//! Event bus for player events

use tokio::sync::broadcast;

use crate::control::volume::Volume;
use crate::types::{PlaybackStatus, TrackInfo};

/// Player events
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback status changed
    StatusChanged {
        /// Old status
        old: PlaybackStatus,
        /// New status
        new: PlaybackStatus,
    },
    /// Volume changed
    VolumeChanged {
        /// New volume level
        volume: Volume,
    },
    /// Now-playing track changed
    TrackChanged {
        /// New track info
        track: TrackInfo,
    },
    /// A stall was detected and recovery started
    StallRecovery,
    /// Audio path failed
    Error {
        /// Error message
        message: String,
    },
}

/// Event bus for distributing events
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Broadcast sender
    tx: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Create a new event bus
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    /// Subscribe to events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event
    pub fn emit(&self, event: PlayerEvent) {
        // Ignore error if no receivers
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
