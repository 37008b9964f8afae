//! Live stream addressing

mod url;

pub use url::StreamUrl;
