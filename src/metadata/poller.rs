//! Periodic now-playing polling

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::source::MetadataSource;
use crate::error::RadioError;
use crate::types::TrackInfo;

/// Background task polling a [`MetadataSource`]
///
/// Polls once immediately, then every `interval`. Failures are logged and
/// otherwise ignored: the published track simply keeps its last value.
/// The task stops on [`MetadataPoller::stop`] or when the poller is dropped.
pub struct MetadataPoller {
    cancel: CancellationToken,
    tracks: watch::Receiver<TrackInfo>,
    task: Option<JoinHandle<()>>,
}

impl MetadataPoller {
    /// Start polling
    ///
    /// `placeholder` is the initially published track; its artist is used
    /// for titles that carry no artist. Must be called within a tokio runtime.
    #[must_use]
    pub fn spawn<S>(source: S, interval: Duration, placeholder: TrackInfo) -> Self
    where
        S: MetadataSource + 'static,
    {
        let cancel = CancellationToken::new();
        let default_artist = placeholder.artist.clone();
        let (tx, tracks) = watch::channel(placeholder);

        let task = tokio::spawn(run(source, interval, default_artist, tx, cancel.clone()));

        Self {
            cancel,
            tracks,
            task: Some(task),
        }
    }

    /// Subscribe to published tracks
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TrackInfo> {
        self.tracks.clone()
    }

    /// Latest published track
    #[must_use]
    pub fn current(&self) -> TrackInfo {
        self.tracks.borrow().clone()
    }

    /// Whether the polling task is still alive
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop polling and wait for the task to exit
    ///
    /// An in-flight request is abandoned.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Metadata poller task failed: {e}");
            }
        }
    }
}

impl Drop for MetadataPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Fetch and parse one title
///
/// Returns `None` when there is nothing new to show, for whatever reason.
pub async fn poll_once<S>(source: &S, default_artist: &str) -> Option<TrackInfo>
where
    S: MetadataSource + ?Sized,
{
    match source.fetch_title().await {
        Ok(Some(title)) => TrackInfo::parse_stream_title(&title, default_artist),
        Ok(None) => {
            tracing::debug!("Metadata endpoint reported no title");
            None
        }
        Err(e @ RadioError::Json(_)) => {
            tracing::warn!("Ignoring metadata: {e}");
            None
        }
        Err(e) => {
            tracing::debug!("Metadata fetch failed: {e}");
            None
        }
    }
}

async fn run<S: MetadataSource>(
    source: S,
    interval: Duration,
    default_artist: String,
    tx: watch::Sender<TrackInfo>,
    cancel: CancellationToken,
) {
    // First tick completes immediately
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!("Metadata poller started (every {interval:?})");
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let track = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            track = poll_once(&source, &default_artist) => track,
        };

        if let Some(track) = track {
            tx.send_if_modified(|current| {
                if *current == track {
                    false
                } else {
                    *current = track;
                    true
                }
            });
        }
    }
    tracing::debug!("Metadata poller stopped");
}
