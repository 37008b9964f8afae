//! Live-stream playback controller
//!
//! A synchronous state machine over an [`AudioOutput`]. It never awaits:
//! starting playback hands back a [`PlayAttempt`] whose outcome the caller
//! drives and reports through [`PlaybackController::complete_attempt`].
//!
//! ```text
//! Idle       --toggle-------------------> Connecting
//! Connecting --Playing event / Ok-------> Playing
//! Connecting --Error event / Err--------> Error
//! Playing    --toggle-------------------> Idle
//! Playing    --Stalled event (reload)---> Connecting
//! Playing    --Error event--------------> Error
//! Error      --toggle (retry)-----------> Connecting
//! ```

use futures::FutureExt;
use futures::future::BoxFuture;
use url::Url;

use crate::audio::{AudioOutput, AudioOutputError, OutputEvent, PlayFuture, SourceId};
use crate::control::volume::Volume;
use crate::error::{RadioError, Result};
use crate::state::{EventBus, PlayerEvent, StateContainer};
use crate::streaming::StreamUrl;
use crate::types::{PlaybackState, PlaybackStatus, PlayerConfig, TrackInfo};

/// Identifier of a single play request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

/// Why a play request was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    /// Listener pressed play
    Start,
    /// Automatic reload after a stall
    Recovery,
}

/// An in-flight play request
pub struct PlayAttempt {
    /// Attempt identifier, to be passed back with the outcome
    pub id: AttemptId,
    /// Why the attempt was made
    pub kind: AttemptKind,
    /// Eventual outcome from the output
    pub outcome: PlayFuture,
}

impl PlayAttempt {
    /// Resolve the outcome, tagged with the attempt id
    pub fn resolve(
        self,
    ) -> BoxFuture<'static, (AttemptId, std::result::Result<(), AudioOutputError>)> {
        let id = self.id;
        self.outcome.map(move |outcome| (id, outcome)).boxed()
    }
}

impl std::fmt::Debug for PlayAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayAttempt")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Attached {
    source: SourceId,
    url: Url,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: AttemptId,
    kind: AttemptKind,
}

/// Playback controller
///
/// Invariant: a play attempt is pending exactly while the status is
/// [`PlaybackStatus::Connecting`], so at most one attempt is ever current.
pub struct PlaybackController<O: AudioOutput> {
    /// Exclusively owned audio output
    output: O,
    /// Stream location
    stream: StreamUrl,
    /// Published state
    state: StateContainer,
    /// Event bus
    events: EventBus,
    /// Source currently attached to the output
    attached: Option<Attached>,
    /// Level restored by unmute
    restore_volume: Volume,
    /// Current attempt, if connecting
    pending: Option<Pending>,
    /// Next attempt id
    next_attempt: u64,
    /// Next source id
    next_source: u64,
}

impl<O: AudioOutput> PlaybackController<O> {
    /// Create a new playback controller
    ///
    /// # Errors
    ///
    /// Returns error if the configured stream URL is invalid
    pub fn new(output: O, config: &PlayerConfig) -> Result<Self> {
        let stream = StreamUrl::parse(&config.stream_url, config.cache_bust_param.clone())?;
        let restore_volume = if config.default_volume.is_silent() {
            Volume::DEFAULT
        } else {
            config.default_volume
        };

        Ok(Self {
            output,
            stream,
            state: StateContainer::new(PlaybackState::new(
                config.default_volume,
                config.placeholder.clone(),
            )),
            events: EventBus::new(),
            attached: None,
            restore_volume,
            pending: None,
            next_attempt: 1,
            next_source: 1,
        })
    }

    /// Get current state snapshot
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state.get()
    }

    /// Get current status
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.state.status()
    }

    /// Get current volume
    #[must_use]
    pub fn volume(&self) -> Volume {
        self.state.volume()
    }

    /// Subscribe to state snapshots
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    /// Event bus carrying this controller's events
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Id of the attempt currently awaited, if any
    #[must_use]
    pub fn pending_attempt(&self) -> Option<AttemptId> {
        self.pending.map(|p| p.id)
    }

    /// URL currently attached to the output
    #[must_use]
    pub fn attached_url(&self) -> Option<&Url> {
        self.attached.as_ref().map(|a| &a.url)
    }

    /// Identity of the source currently attached to the output
    #[must_use]
    pub fn attached_source(&self) -> Option<SourceId> {
        self.attached.as_ref().map(|a| a.source)
    }

    // === Listener Commands ===

    /// Toggle between listening and stopped
    ///
    /// From `Idle` or `Error` this starts a fresh connection and returns the
    /// attempt to drive. From `Playing` it stops synchronously. While
    /// `Connecting` it does nothing.
    pub fn toggle_play(&mut self) -> Option<PlayAttempt> {
        match self.status() {
            PlaybackStatus::Idle | PlaybackStatus::Error => self.start(),
            PlaybackStatus::Connecting => {
                tracing::debug!("Ignoring toggle while a play attempt is in flight");
                None
            }
            PlaybackStatus::Playing => {
                self.stop();
                None
            }
        }
    }

    /// Set volume, clamped to `[0, 100]`
    ///
    /// Applied to the output immediately if a source is attached. Returns
    /// the effective volume.
    pub fn set_volume(&mut self, level: i32) -> Volume {
        let volume = Volume::clamped(level);
        if !volume.is_silent() {
            self.restore_volume = volume;
        }

        if self.state.set_volume(volume) {
            tracing::debug!("Volume set to {volume}");
            self.events.emit(PlayerEvent::VolumeChanged { volume });
        }

        if self.attached.is_some() {
            if let Err(e) = self.output.set_volume(volume) {
                tracing::warn!("Output rejected volume {volume}: {e}");
            }
        }
        volume
    }

    /// Mute, or restore the last audible volume
    pub fn mute_toggle(&mut self) -> Volume {
        let current = self.volume();
        if current.is_silent() {
            self.set_volume(i32::from(self.restore_volume.as_percent()))
        } else {
            self.restore_volume = current;
            self.set_volume(0)
        }
    }

    /// Replace the now-playing track
    pub fn set_now_playing(&mut self, track: TrackInfo) {
        if self.state.set_now_playing(track.clone()) {
            tracing::info!("Now playing: {track}");
            self.events.emit(PlayerEvent::TrackChanged { track });
        }
    }

    /// Stop everything and release the output
    pub fn shutdown(&mut self) {
        self.pending = None;
        if self.attached.is_some() {
            self.release();
        }
        self.set_status(PlaybackStatus::Idle);
    }

    // === Output Feedback ===

    /// Apply the outcome of a play attempt
    ///
    /// Outcomes of attempts that are no longer current (the listener
    /// stopped, or the output already confirmed playback) are ignored.
    pub fn complete_attempt(
        &mut self,
        id: AttemptId,
        outcome: std::result::Result<(), AudioOutputError>,
    ) {
        let Some(pending) = self.pending.filter(|p| p.id == id) else {
            tracing::debug!("Ignoring outcome of superseded play attempt {id:?}");
            return;
        };
        self.pending = None;

        match outcome {
            Ok(()) => {
                tracing::debug!("Play attempt {id:?} ({:?}) succeeded", pending.kind);
                self.set_status(PlaybackStatus::Playing);
            }
            Err(e) => self.fail(e),
        }
    }

    /// React to an event reported by the output
    ///
    /// Events raised by any source other than the attached one are stale
    /// and ignored. Returns a recovery attempt when a stall interrupts
    /// playback.
    pub fn handle_output_event(
        &mut self,
        source: SourceId,
        event: OutputEvent,
    ) -> Option<PlayAttempt> {
        if self.attached_source() != Some(source) {
            tracing::debug!("Ignoring output event {event:?} from detached source {source:?}");
            return None;
        }

        match (event, self.status()) {
            (OutputEvent::Playing, PlaybackStatus::Connecting) => {
                self.pending = None;
                self.set_status(PlaybackStatus::Playing);
                None
            }
            (OutputEvent::Stalled, PlaybackStatus::Playing) => self.recover(),
            (OutputEvent::Stalled, PlaybackStatus::Connecting) => {
                tracing::debug!("Stall while connecting, attempt already in flight");
                None
            }
            (OutputEvent::Error(reason), PlaybackStatus::Connecting | PlaybackStatus::Playing) => {
                self.fail(AudioOutputError::StreamError(reason));
                None
            }
            (event, status) => {
                tracing::debug!("Ignoring output event {event:?} while {status}");
                None
            }
        }
    }

    // === Transitions ===

    fn start(&mut self) -> Option<PlayAttempt> {
        self.state.set_last_error(None);
        self.set_status(PlaybackStatus::Connecting);
        // Never resume a cached source; always reconnect at the live edge
        self.output.detach();
        let url = self.stream.fresh();
        self.launch(url, AttemptKind::Start)
    }

    fn recover(&mut self) -> Option<PlayAttempt> {
        let url = match &self.attached {
            Some(attached) => attached.url.clone(),
            None => self.stream.fresh(),
        };
        tracing::info!("Stream stalled, reloading {url}");
        self.events.emit(PlayerEvent::StallRecovery);
        self.set_status(PlaybackStatus::Connecting);
        self.output.detach();
        self.launch(url, AttemptKind::Recovery)
    }

    fn launch(&mut self, url: Url, kind: AttemptKind) -> Option<PlayAttempt> {
        let source = SourceId::new(self.next_source);
        self.next_source += 1;

        tracing::debug!("Attaching {url} as {source:?}");
        if let Err(e) = self.output.attach(source, url.as_str()) {
            self.attached = None;
            self.fail(e);
            return None;
        }
        self.attached = Some(Attached { source, url });

        let volume = self.volume();
        if let Err(e) = self.output.set_volume(volume) {
            tracing::warn!("Output rejected volume {volume}: {e}");
        }

        let id = AttemptId(self.next_attempt);
        self.next_attempt += 1;
        self.pending = Some(Pending { id, kind });

        Some(PlayAttempt {
            id,
            kind,
            outcome: self.output.play(),
        })
    }

    fn stop(&mut self) {
        self.pending = None;
        self.release();
        self.set_status(PlaybackStatus::Idle);
    }

    fn fail(&mut self, error: AudioOutputError) {
        let error = RadioError::from(error);
        tracing::warn!("Playback failed: {error}");

        self.pending = None;
        if self.attached.is_some() {
            self.release();
        }

        let message = error.to_string();
        self.state.set_last_error(Some(message.clone()));
        self.set_status(PlaybackStatus::Error);
        self.events.emit(PlayerEvent::Error { message });
    }

    fn release(&mut self) {
        self.output.pause();
        self.output.detach();
        self.attached = None;
    }

    fn set_status(&mut self, new: PlaybackStatus) {
        let old = self.status();
        if self.state.set_status(new) {
            tracing::info!("Playback {old} -> {new}");
            self.events.emit(PlayerEvent::StatusChanged { old, new });
        }
    }
}
