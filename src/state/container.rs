//! Published playback state

use tokio::sync::watch;

use crate::control::volume::Volume;
use crate::types::{PlaybackState, PlaybackStatus, TrackInfo};

/// State container with change notifications
///
/// Written only by the controller; readers hold [`watch::Receiver`]s and
/// always see the latest snapshot.
pub struct StateContainer {
    /// State change sender (holds the current value)
    tx: watch::Sender<PlaybackState>,
}

impl StateContainer {
    /// Create a new state container
    #[must_use]
    pub fn new(initial: PlaybackState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Get current state
    #[must_use]
    pub fn get(&self) -> PlaybackState {
        self.tx.borrow().clone()
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.tx.borrow().status
    }

    /// Current volume
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.tx.borrow().volume
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.tx.subscribe()
    }

    /// Update state with a function, notifying subscribers only on change
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut PlaybackState),
    {
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            f(state);
            *state != before
        })
    }

    /// Set playback status
    pub fn set_status(&self, status: PlaybackStatus) -> bool {
        self.update(|s| s.status = status)
    }

    /// Set volume
    pub fn set_volume(&self, volume: Volume) -> bool {
        self.update(|s| s.volume = volume)
    }

    /// Set now-playing track
    pub fn set_now_playing(&self, track: TrackInfo) -> bool {
        self.update(|s| s.now_playing = track)
    }

    /// Record or clear the last user-visible error
    pub fn set_last_error(&self, message: Option<String>) -> bool {
        self.update(|s| s.last_error = message)
    }
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new(PlaybackState::default())
    }
}
