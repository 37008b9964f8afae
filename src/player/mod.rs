//! High-level player API
//!
//! [`RadioPlayer`] owns a [`PlaybackController`] inside a single tokio task.
//! Listener commands, output events, play outcomes and metadata updates are
//! all funnelled through that task, so transitions never interleave.

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::audio::{AudioOutput, AudioOutputError, OutputEvents, OutputReport};
use crate::control::{AttemptId, PlayAttempt, PlaybackController, Volume};
use crate::error::{RadioError, Result};
#[cfg(feature = "http")]
use crate::metadata::HttpMetadataSource;
use crate::metadata::{MetadataPoller, MetadataSource};
use crate::state::{EventBus, PlayerEvent};
use crate::types::{PlaybackState, PlaybackStatus, PlayerConfig, TrackInfo};


/// Requests sent to the player task
enum PlayerCommand {
    TogglePlay {
        reply: oneshot::Sender<PlaybackStatus>,
    },
    SetVolume {
        level: i32,
        reply: oneshot::Sender<Volume>,
    },
    MuteToggle {
        reply: oneshot::Sender<Volume>,
    },
    Shutdown,
}

/// Live radio player
///
/// # Example
///
/// ```rust,no_run
/// use liveradio::testing::MockOutput;
/// use liveradio::{PlayerConfig, RadioPlayer};
///
/// # async fn example() -> Result<(), liveradio::RadioError> {
/// let config = PlayerConfig::builder()
///     .metadata_url("https://rs2.ptservidor.com/status-json.xsl")
///     .build()?;
/// let (output, _handle) = MockOutput::new();
///
/// let player = RadioPlayer::spawn_with_http(&config, output)?;
/// player.toggle_play().await?;
/// player.set_volume(65).await?;
///
/// let mut state = player.subscribe();
/// state.changed().await.ok();
/// println!("{}", state.borrow().now_playing);
///
/// player.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct RadioPlayer {
    /// Command channel into the player task
    commands: mpsc::Sender<PlayerCommand>,
    /// Published state
    state: watch::Receiver<PlaybackState>,
    /// Event bus shared with the controller
    events: EventBus,
    /// Stops the player task
    cancel: CancellationToken,
    /// Player task
    task: Option<JoinHandle<()>>,
}

impl RadioPlayer {
    /// Start a player without metadata polling
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn spawn<O: AudioOutput>(config: &PlayerConfig, output: O) -> Result<Self> {
        Self::launch(config, output, None)
    }

    /// Start a player polling `source` for now-playing metadata
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid
    pub fn spawn_with_source<O, S>(config: &PlayerConfig, output: O, source: S) -> Result<Self>
    where
        O: AudioOutput,
        S: MetadataSource + 'static,
    {
        config.validate()?;
        let poller =
            MetadataPoller::spawn(source, config.poll_interval, config.placeholder.clone());
        Self::launch(config, output, Some(poller))
    }

    /// Start a player polling the configured metadata endpoint over HTTP
    ///
    /// Without a `metadata_url` this is the same as [`RadioPlayer::spawn`].
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be built
    #[cfg(feature = "http")]
    pub fn spawn_with_http<O: AudioOutput>(config: &PlayerConfig, output: O) -> Result<Self> {
        match &config.metadata_url {
            Some(url) => {
                let source = HttpMetadataSource::new(url, config.request_timeout)?;
                Self::spawn_with_source(config, output, source)
            }
            None => Self::spawn(config, output),
        }
    }

    fn launch<O: AudioOutput>(
        config: &PlayerConfig,
        mut output: O,
        poller: Option<MetadataPoller>,
    ) -> Result<Self> {
        config.validate()?;

        let (sink, output_events) = OutputEvents::channel();
        output.subscribe(sink);
        let controller = PlaybackController::new(output, config)?;

        let (commands, command_rx) = mpsc::channel(config.command_buffer);
        let state = controller.subscribe();
        let events = controller.events().clone();
        let cancel = CancellationToken::new();

        let actor = Actor {
            controller,
            commands: command_rx,
            output_events,
            tracks: poller.as_ref().map(MetadataPoller::subscribe),
            poller,
            in_flight: None,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(actor.run());
        tracing::info!("Player started for {}", config.stream_url);

        Ok(Self {
            commands,
            state,
            events,
            cancel,
            task: Some(task),
        })
    }

    /// Toggle between listening and stopped
    ///
    /// Returns the status right after the command was applied. Ignored
    /// while a connection attempt is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`RadioError::PlayerClosed`] after shutdown
    pub async fn toggle_play(&self) -> Result<PlaybackStatus> {
        self.request(|reply| PlayerCommand::TogglePlay { reply })
            .await
    }

    /// Set the volume, clamped to `[0, 100]`
    ///
    /// # Errors
    ///
    /// Returns [`RadioError::PlayerClosed`] after shutdown
    pub async fn set_volume(&self, level: i32) -> Result<Volume> {
        self.request(|reply| PlayerCommand::SetVolume { level, reply })
            .await
    }

    /// Mute, or restore the last audible volume
    ///
    /// # Errors
    ///
    /// Returns [`RadioError::PlayerClosed`] after shutdown
    pub async fn mute_toggle(&self) -> Result<Volume> {
        self.request(|reply| PlayerCommand::MuteToggle { reply })
            .await
    }

    /// Current state snapshot
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.state.borrow().status
    }

    /// Subscribe to state snapshots
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.clone()
    }

    /// Subscribe to player events
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Whether the player task is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop playback, stop polling and wait for the player task to exit
    ///
    /// Commands sent before this call are applied first.
    pub async fn shutdown(mut self) {
        if self.commands.send(PlayerCommand::Shutdown).await.is_err() {
            self.cancel.cancel();
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Player task failed: {e}");
            }
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> PlayerCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| RadioError::PlayerClosed)?;
        response.await.map_err(|_| RadioError::PlayerClosed)
    }
}

impl Drop for RadioPlayer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// State owned by the player task
struct Actor<O: AudioOutput> {
    controller: PlaybackController<O>,
    commands: mpsc::Receiver<PlayerCommand>,
    output_events: mpsc::UnboundedReceiver<OutputReport>,
    tracks: Option<watch::Receiver<TrackInfo>>,
    poller: Option<MetadataPoller>,
    /// Play request awaited for the controller's pending attempt
    in_flight: Option<PlayAttempt>,
    cancel: CancellationToken,
}

impl<O: AudioOutput> Actor<O> {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(report) = self.output_events.recv() => {
                    let attempt = self.controller.handle_output_event(report.source, report.event);
                    self.track(attempt);
                }
                (id, outcome) = next_outcome(&mut self.in_flight) => {
                    self.in_flight = None;
                    self.controller.complete_attempt(id, outcome);
                }
                Some(track) = next_track(&mut self.tracks) => {
                    self.controller.set_now_playing(track);
                }
            }
            self.drop_superseded();
        }
        self.teardown().await;
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::TogglePlay { reply } => {
                let attempt = self.controller.toggle_play();
                self.track(attempt);
                let _ = reply.send(self.controller.status());
            }
            PlayerCommand::SetVolume { level, reply } => {
                let _ = reply.send(self.controller.set_volume(level));
            }
            PlayerCommand::MuteToggle { reply } => {
                let _ = reply.send(self.controller.mute_toggle());
            }
            PlayerCommand::Shutdown => {}
        }
    }

    fn track(&mut self, attempt: Option<PlayAttempt>) {
        if let Some(attempt) = attempt {
            tracing::debug!("Awaiting play attempt {:?} ({:?})", attempt.id, attempt.kind);
            self.in_flight = Some(attempt);
        }
    }

    /// Forget a play request the controller no longer waits for
    fn drop_superseded(&mut self) {
        let current = self.controller.pending_attempt();
        if self
            .in_flight
            .as_ref()
            .is_some_and(|attempt| Some(attempt.id) != current)
        {
            tracing::debug!("Dropping superseded play attempt");
            self.in_flight = None;
        }
    }

    async fn teardown(mut self) {
        self.in_flight = None;
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        self.controller.shutdown();
        tracing::info!("Player stopped");
    }
}

async fn next_outcome(
    in_flight: &mut Option<PlayAttempt>,
) -> (AttemptId, std::result::Result<(), AudioOutputError>) {
    match in_flight {
        Some(attempt) => {
            let outcome = (&mut attempt.outcome).await;
            (attempt.id, outcome)
        }
        None => std::future::pending().await,
    }
}

/// Next published track; `None` once the poller is gone
async fn next_track(tracks: &mut Option<watch::Receiver<TrackInfo>>) -> Option<TrackInfo> {
    let Some(rx) = tracks.as_mut() else {
        return std::future::pending().await;
    };
    if rx.changed().await.is_ok() {
        return Some(rx.borrow_and_update().clone());
    }
    *tracks = None;
    None
}
