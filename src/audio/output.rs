//! Audio output abstraction
//!
//! The player never decodes audio itself. It drives an opaque output that
//! can load a URL, play, pause and report what it is doing through
//! [`OutputEvent`]s.

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::control::volume::Volume;

/// Errors from audio output
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioOutputError {
    /// Source could not be attached
    #[error("attach failed: {0}")]
    AttachFailed(String),

    /// Output refused or failed to start playback
    #[error("play rejected: {0}")]
    PlayRejected(String),

    /// Stream failed while loading or playing
    #[error("stream error: {0}")]
    StreamError(String),

    /// Output closed
    #[error("output closed")]
    Closed,
}

/// Identity of one attached source
///
/// Assigned by the controller on every `attach`. Outputs stamp each event
/// with the source that raised it, so reports from a source that has since
/// been detached can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Notifications from the output about the real playback state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Audio is audibly playing
    Playing,
    /// Playback stopped waiting for data (buffer underrun, network stall)
    Stalled,
    /// The stream failed
    Error(String),
}

/// An [`OutputEvent`] tagged with the source it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    /// Source that raised the event
    pub source: SourceId,
    /// What happened
    pub event: OutputEvent,
}

/// Eventual outcome of [`AudioOutput::play`]
pub type PlayFuture = BoxFuture<'static, Result<(), AudioOutputError>>;

/// Sending half handed to an output so it can report [`OutputEvent`]s
#[derive(Debug, Clone)]
pub struct OutputEvents {
    tx: mpsc::UnboundedSender<OutputReport>,
}

impl OutputEvents {
    /// Create a connected sender/receiver pair
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutputReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report an event raised by `source`; silently dropped once the player is gone
    pub fn emit(&self, source: SourceId, event: OutputEvent) {
        let _ = self.tx.send(OutputReport { source, event });
    }

    /// Report that audio from `source` is playing
    pub fn playing(&self, source: SourceId) {
        self.emit(source, OutputEvent::Playing);
    }

    /// Report a stall of `source`
    pub fn stalled(&self, source: SourceId) {
        self.emit(source, OutputEvent::Stalled);
    }

    /// Report a failure of `source`
    pub fn error(&self, source: SourceId, reason: impl Into<String>) {
        self.emit(source, OutputEvent::Error(reason.into()));
    }
}

/// Audio output trait
///
/// Implementations wrap whatever actually renders the stream. The player
/// owns its output exclusively; nothing else may call these methods.
pub trait AudioOutput: Send + 'static {
    /// Register the sink for playback events
    ///
    /// Called once, before any other method.
    fn subscribe(&mut self, events: OutputEvents);

    /// Load a stream URL as `source`, replacing any previous source
    ///
    /// Events raised by the new source must carry `source`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL cannot be loaded
    fn attach(&mut self, source: SourceId, url: &str) -> Result<(), AudioOutputError>;

    /// Drop the current source so no more data is fetched
    fn detach(&mut self);

    /// Start playback of the attached source
    ///
    /// The returned future resolves once playback has started or failed.
    /// It must not borrow the output.
    fn play(&mut self) -> PlayFuture;

    /// Pause playback
    fn pause(&mut self);

    /// Set volume
    ///
    /// # Errors
    ///
    /// Returns error if the output rejects the change
    fn set_volume(&mut self, volume: Volume) -> Result<(), AudioOutputError>;
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn subscribe(&mut self, events: OutputEvents) {
        (**self).subscribe(events);
    }

    fn attach(&mut self, source: SourceId, url: &str) -> Result<(), AudioOutputError> {
        (**self).attach(source, url)
    }

    fn detach(&mut self) {
        (**self).detach();
    }

    fn play(&mut self) -> PlayFuture {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), AudioOutputError> {
        (**self).set_volume(volume)
    }
}
