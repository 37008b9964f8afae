//! Now-playing metadata sources

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// A readable now-playing endpoint
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the current free-text stream title
    ///
    /// `Ok(None)` means the endpoint answered but carried no title.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or an
    /// undecodable payload
    async fn fetch_title(&self) -> Result<Option<String>>;
}

#[async_trait]
impl<T: MetadataSource + ?Sized> MetadataSource for Box<T> {
    async fn fetch_title(&self) -> Result<Option<String>> {
        (**self).fetch_title().await
    }
}

/// Icecast-style status document
///
/// Accepts both `{"icestats": {"source": ...}}` and a bare
/// `{"source": ...}`, where `source` is a single object or a list.
#[derive(Debug, Default, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    icestats: Option<SourceList>,
    #[serde(default)]
    source: Option<OneOrMany<SourceEntry>>,
}

#[derive(Debug, Default, Deserialize)]
struct SourceList {
    #[serde(default)]
    source: Option<OneOrMany<SourceEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    // Tried first: a struct would also accept a one-element list
    Many(Vec<T>),
    One(T),
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    #[serde(default)]
    title: Option<serde_json::Value>,
}

impl StatusDocument {
    /// Decode a status document
    ///
    /// # Errors
    ///
    /// Returns error if the payload is not a JSON object of the expected shape
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Title of the first source, if present and non-blank
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let sources = self
            .icestats
            .as_ref()
            .and_then(|stats| stats.source.as_ref())
            .or(self.source.as_ref())?;

        let first = match sources {
            OneOrMany::One(entry) => entry,
            OneOrMany::Many(entries) => entries.first()?,
        };

        // Some servers report numeric titles unquoted
        let title = match first.title.as_ref()? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }
}

#[cfg(feature = "http")]
pub use http::HttpMetadataSource;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use url::Url;

    use super::{MetadataSource, StatusDocument};
    use crate::error::{RadioError, Result};

    /// Metadata source reading an Icecast JSON status endpoint over HTTP
    #[derive(Debug, Clone)]
    pub struct HttpMetadataSource {
        client: reqwest::Client,
        url: Url,
    }

    impl HttpMetadataSource {
        /// Create a source for the given endpoint
        ///
        /// # Errors
        ///
        /// Returns error if the URL is invalid or the HTTP client cannot be built
        pub fn new(url: &str, timeout: Duration) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("liveradio/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self::with_client(client, Url::parse(url)?))
        }

        /// Create a source sharing an existing client
        #[must_use]
        pub fn with_client(client: reqwest::Client, url: Url) -> Self {
            Self { client, url }
        }

        /// Endpoint URL
        #[must_use]
        pub fn url(&self) -> &Url {
            &self.url
        }
    }

    #[async_trait]
    impl MetadataSource for HttpMetadataSource {
        async fn fetch_title(&self) -> Result<Option<String>> {
            let response = self.client.get(self.url.clone()).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(RadioError::MetadataStatus {
                    status: status.as_u16(),
                });
            }

            let body = response.bytes().await?;
            Ok(StatusDocument::from_slice(&body)?.title())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(json: &str) -> Option<String> {
        StatusDocument::from_slice(json.as_bytes()).unwrap().title()
    }

    #[test]
    fn test_single_icecast_source() {
        let json = r#"{
            "icestats": {
                "admin": "webradiofigueiro@gmail.com",
                "source": { "listeners": 12, "title": "DJ Durval - Night Grooves" }
            }
        }"#;
        assert_eq!(title_of(json).as_deref(), Some("DJ Durval - Night Grooves"));
    }

    #[test]
    fn test_first_of_many_sources() {
        let json = r#"{ "icestats": { "source": [
            { "title": "First - Song" },
            { "title": "Second - Song" }
        ] } }"#;
        assert_eq!(title_of(json).as_deref(), Some("First - Song"));
    }

    #[test]
    fn test_top_level_source() {
        assert_eq!(
            title_of(r#"{ "source": { "title": " Just A Title " } }"#).as_deref(),
            Some("Just A Title")
        );
    }

    #[test]
    fn test_missing_or_blank_title() {
        assert_eq!(title_of(r#"{ "icestats": { "source": { "listeners": 3 } } }"#), None);
        assert_eq!(title_of(r#"{ "icestats": { "source": [] } }"#), None);
        assert_eq!(title_of(r#"{ "icestats": {} }"#), None);
        assert_eq!(title_of(r#"{ "source": { "title": "   " } }"#), None);
        assert_eq!(title_of(r#"{ "source": { "title": null } }"#), None);
        assert_eq!(title_of("{}"), None);
    }

    #[test]
    fn test_numeric_title() {
        assert_eq!(
            title_of(r#"{ "source": { "title": 1985 } }"#).as_deref(),
            Some("1985")
        );
    }

    #[test]
    fn test_malformed_payload() {
        assert!(StatusDocument::from_slice(b"<html>").is_err());
        assert!(StatusDocument::from_slice(b"[1, 2]").is_err());
    }

    #[cfg(feature = "http")]
    mod http_endpoint {
        use std::time::Duration;

        use serde_json::json;
        use wiremock::matchers::{header_exists, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::super::{HttpMetadataSource, MetadataSource};
        use crate::error::RadioError;

        const STATUS_PATH: &str = "/status-json.xsl";

        fn source_for(server: &MockServer) -> HttpMetadataSource {
            let url = format!("{}{STATUS_PATH}", server.uri());
            HttpMetadataSource::new(&url, Duration::from_secs(2)).unwrap()
        }

        async fn respond(server: &MockServer, response: ResponseTemplate) {
            Mock::given(method("GET"))
                .and(path(STATUS_PATH))
                .respond_with(response)
                .expect(1)
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn test_fetches_icecast_title() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(STATUS_PATH))
                .and(header_exists("user-agent"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "icestats": {
                        "source": { "listeners": 12, "title": "DJ Durval - Night Grooves" }
                    }
                })))
                .expect(1)
                .mount(&server)
                .await;

            let title = source_for(&server).fetch_title().await.unwrap();

            assert_eq!(title.as_deref(), Some("DJ Durval - Night Grooves"));
        }

        #[tokio::test]
        async fn test_non_success_status() {
            let server = MockServer::start().await;
            respond(&server, ResponseTemplate::new(503)).await;

            let err = source_for(&server).fetch_title().await.unwrap_err();

            assert!(matches!(err, RadioError::MetadataStatus { status: 503 }));
            assert!(err.is_recoverable());
            assert!(!err.is_user_visible());
        }

        #[tokio::test]
        async fn test_malformed_json() {
            let server = MockServer::start().await;
            respond(
                &server,
                ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
            )
            .await;

            let err = source_for(&server).fetch_title().await.unwrap_err();

            assert!(matches!(err, RadioError::Json(_)));
        }

        #[tokio::test]
        async fn test_missing_title() {
            let server = MockServer::start().await;
            respond(
                &server,
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "icestats": { "source": { "listeners": 4 } } })),
            )
            .await;

            assert_eq!(source_for(&server).fetch_title().await.unwrap(), None);
        }

        #[tokio::test]
        async fn test_slow_endpoint_times_out() {
            let server = MockServer::start().await;
            respond(
                &server,
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "source": { "title": "Too - Late" } }))
                    .set_delay(Duration::from_secs(5)),
            )
            .await;
            let url = format!("{}{STATUS_PATH}", server.uri());
            let source = HttpMetadataSource::new(&url, Duration::from_millis(100)).unwrap();

            let err = source.fetch_title().await.unwrap_err();

            assert!(matches!(err, RadioError::Http(_)));
        }

        #[tokio::test]
        async fn test_unknown_path() {
            // Nothing mounted, so every request gets a 404
            let server = MockServer::start().await;

            let err = source_for(&server).fetch_title().await.unwrap_err();

            assert!(matches!(err, RadioError::MetadataStatus { status: 404 }));
            assert_eq!(server.received_requests().await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_unreachable_endpoint() {
            let source =
                HttpMetadataSource::new("http://127.0.0.1:9/status-json.xsl", Duration::from_secs(2))
                    .unwrap();

            assert!(matches!(
                source.fetch_title().await,
                Err(RadioError::Http(_))
            ));
        }

        #[test]
        fn test_invalid_url() {
            assert!(matches!(
                HttpMetadataSource::new("not a url", Duration::from_secs(1)),
                Err(RadioError::InvalidUrl(_))
            ));
        }
    }
}
