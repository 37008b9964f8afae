//! Scripted [`MetadataSource`] for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{RadioError, Result};
use crate::metadata::MetadataSource;

/// One scripted answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Endpoint reports this title
    Title(String),
    /// Endpoint answers without a title
    NoTitle,
    /// Endpoint answers with a non-success HTTP status
    Status(u16),
    /// Request never completes
    Hang,
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<MockResponse>>,
    fetches: AtomicUsize,
}

/// Metadata source answering from a script
///
/// Once the script is exhausted every fetch answers [`MockResponse::NoTitle`].
/// Clones share the script and the fetch counter.
#[derive(Clone, Default)]
pub struct MockSource {
    inner: Arc<Inner>,
}

impl MockSource {
    /// Create a source with an empty script
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from a list of responses
    #[must_use]
    pub fn scripted(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        let source = Self::new();
        for response in responses {
            source.push(response);
        }
        source
    }

    /// Append a response to the script
    pub fn push(&self, response: MockResponse) {
        self.inner
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Append a title response
    pub fn push_title(&self, title: impl Into<String>) {
        self.push(MockResponse::Title(title.into()));
    }

    /// Number of fetches started so far
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    async fn fetch_title(&self) -> Result<Option<String>> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self
            .inner
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(MockResponse::NoTitle);

        match next {
            MockResponse::Title(title) => Ok(Some(title)),
            MockResponse::NoTitle => Ok(None),
            MockResponse::Status(status) => Err(RadioError::MetadataStatus { status }),
            MockResponse::Hang => std::future::pending().await,
        }
    }
}
