//! Cache-busted stream URLs

use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

use crate::error::Result;

/// Stream location that hands out a distinct URL for every fresh connection
///
/// Each call to [`StreamUrl::fresh`] appends `<param>=<millis>-<seq>` so that
/// neither a browser-style cache nor an intermediary proxy can hand back a
/// stale connection. The base query string is left untouched.
#[derive(Debug, Clone)]
pub struct StreamUrl {
    /// Base URL as configured
    base: Url,
    /// Name of the cache-busting query parameter
    param: String,
    /// Sequence number, distinguishes URLs created within the same millisecond
    seq: u64,
}

impl StreamUrl {
    /// Parse a stream base URL
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid
    pub fn parse(base: &str, param: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: Url::parse(base)?,
            param: param.into(),
            seq: 0,
        })
    }

    /// Base URL without cache-busting
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Produce a new, never-before-returned URL for a fresh connection
    pub fn fresh(&mut self) -> Url {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        self.seq = self.seq.wrapping_add(1);

        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(&self.param, &format!("{millis}-{}", self.seq));
        url
    }
}
