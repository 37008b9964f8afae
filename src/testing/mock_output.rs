//! Scriptable [`AudioOutput`] for tests.
//!
//! The output half is moved into the player; the cloneable
//! [`MockOutputHandle`] stays with the test to inspect recorded calls,
//! resolve pending play requests and inject [`OutputEvent`]s.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::oneshot;

use crate::audio::{
    AudioOutput, AudioOutputError, OutputEvent, OutputEvents, PlayFuture, SourceId,
};
use crate::control::volume::Volume;

/// A call made on the mock output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCall {
    /// `subscribe`
    Subscribe,
    /// `attach(url)`
    Attach(String),
    /// `detach()`
    Detach,
    /// `play()`
    Play,
    /// `pause()`
    Pause,
    /// `set_volume(volume)`
    SetVolume(Volume),
}

/// How `play()` resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayBehavior {
    /// Resolve successfully right away
    Succeed,
    /// Fail right away
    Fail(AudioOutputError),
    /// Stay pending until resolved through [`MockOutputHandle::resolve_play`]
    Manual,
}

struct Shared {
    calls: Vec<OutputCall>,
    behavior: PlayBehavior,
    pending_plays: VecDeque<oneshot::Sender<Result<(), AudioOutputError>>>,
    next_attach_error: Option<AudioOutputError>,
    events: Option<OutputEvents>,
    attached: Option<String>,
    /// Source currently attached
    source: Option<SourceId>,
    /// Most recently attached source, kept after detach
    last_source: Option<SourceId>,
    volume: Option<Volume>,
}

/// Mock audio output
pub struct MockOutput {
    shared: Arc<Mutex<Shared>>,
}

/// Test-side handle to a [`MockOutput`]
#[derive(Clone)]
pub struct MockOutputHandle {
    shared: Arc<Mutex<Shared>>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockOutput {
    /// Create a mock whose play requests stay pending until resolved
    #[must_use]
    pub fn new() -> (Self, MockOutputHandle) {
        Self::with_behavior(PlayBehavior::Manual)
    }

    /// Create a mock with the given play behavior
    #[must_use]
    pub fn with_behavior(behavior: PlayBehavior) -> (Self, MockOutputHandle) {
        let shared = Arc::new(Mutex::new(Shared {
            calls: Vec::new(),
            behavior,
            pending_plays: VecDeque::new(),
            next_attach_error: None,
            events: None,
            attached: None,
            source: None,
            last_source: None,
            volume: None,
        }));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockOutputHandle { shared },
        )
    }
}

impl AudioOutput for MockOutput {
    fn subscribe(&mut self, events: OutputEvents) {
        let mut shared = lock(&self.shared);
        shared.calls.push(OutputCall::Subscribe);
        shared.events = Some(events);
    }

    fn attach(&mut self, source: SourceId, url: &str) -> Result<(), AudioOutputError> {
        let mut shared = lock(&self.shared);
        shared.calls.push(OutputCall::Attach(url.to_string()));
        if let Some(err) = shared.next_attach_error.take() {
            return Err(err);
        }
        shared.attached = Some(url.to_string());
        shared.source = Some(source);
        shared.last_source = Some(source);
        Ok(())
    }

    fn detach(&mut self) {
        let mut shared = lock(&self.shared);
        shared.calls.push(OutputCall::Detach);
        shared.attached = None;
        shared.source = None;
    }

    fn play(&mut self) -> PlayFuture {
        let mut shared = lock(&self.shared);
        shared.calls.push(OutputCall::Play);
        match shared.behavior.clone() {
            PlayBehavior::Succeed => futures::future::ready(Ok(())).boxed(),
            PlayBehavior::Fail(err) => futures::future::ready(Err(err)).boxed(),
            PlayBehavior::Manual => {
                let (tx, rx) = oneshot::channel();
                shared.pending_plays.push_back(tx);
                async move { rx.await.unwrap_or(Err(AudioOutputError::Closed)) }.boxed()
            }
        }
    }

    fn pause(&mut self) {
        lock(&self.shared).calls.push(OutputCall::Pause);
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), AudioOutputError> {
        let mut shared = lock(&self.shared);
        shared.calls.push(OutputCall::SetVolume(volume));
        shared.volume = Some(volume);
        Ok(())
    }
}

impl MockOutputHandle {
    /// All calls recorded so far
    #[must_use]
    pub fn calls(&self) -> Vec<OutputCall> {
        lock(&self.shared).calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        lock(&self.shared).calls.clear();
    }

    /// Number of `play()` calls
    #[must_use]
    pub fn play_count(&self) -> usize {
        lock(&self.shared)
            .calls
            .iter()
            .filter(|c| **c == OutputCall::Play)
            .count()
    }

    /// URLs passed to `attach()`, in order
    #[must_use]
    pub fn attached_urls(&self) -> Vec<String> {
        lock(&self.shared)
            .calls
            .iter()
            .filter_map(|c| match c {
                OutputCall::Attach(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    /// Currently attached URL
    #[must_use]
    pub fn attached(&self) -> Option<String> {
        lock(&self.shared).attached.clone()
    }

    /// Source currently attached
    #[must_use]
    pub fn attached_source(&self) -> Option<SourceId> {
        lock(&self.shared).source
    }

    /// Most recently attached source, even if detached since
    #[must_use]
    pub fn last_source(&self) -> Option<SourceId> {
        lock(&self.shared).last_source
    }

    /// Last volume applied to the output
    #[must_use]
    pub fn volume(&self) -> Option<Volume> {
        lock(&self.shared).volume
    }

    /// Whether the player has subscribed to events
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        lock(&self.shared).events.is_some()
    }

    /// Change how subsequent `play()` calls resolve
    pub fn set_behavior(&self, behavior: PlayBehavior) {
        lock(&self.shared).behavior = behavior;
    }

    /// Make the next `attach()` fail
    pub fn fail_next_attach(&self, err: AudioOutputError) {
        lock(&self.shared).next_attach_error = Some(err);
    }

    /// Number of play requests awaiting resolution
    #[must_use]
    pub fn pending_plays(&self) -> usize {
        lock(&self.shared)
            .pending_plays
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Resolve the oldest pending play request still awaited
    ///
    /// Returns false if no play request was waiting.
    pub fn resolve_play(&self, outcome: Result<(), AudioOutputError>) -> bool {
        let mut shared = lock(&self.shared);
        while let Some(tx) = shared.pending_plays.pop_front() {
            if tx.send(outcome.clone()).is_ok() {
                return true;
            }
        }
        false
    }

    /// Report an event from the most recently attached source
    ///
    /// The source may have been detached since, in which case the player
    /// sees a late report. Returns false if the player never subscribed or
    /// nothing was ever attached.
    pub fn emit(&self, event: OutputEvent) -> bool {
        let Some(source) = self.last_source() else {
            return false;
        };
        self.emit_from(source, event)
    }

    /// Report an event raised by `source`
    ///
    /// Returns false if the player never subscribed.
    pub fn emit_from(&self, source: SourceId, event: OutputEvent) -> bool {
        let shared = lock(&self.shared);
        match &shared.events {
            Some(events) => {
                events.emit(source, event);
                true
            }
            None => false,
        }
    }
}
