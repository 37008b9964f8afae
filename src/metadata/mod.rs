//! Now-playing metadata

mod poller;
mod source;


pub use poller::{MetadataPoller, poll_once};
#[cfg(feature = "http")]
pub use source::HttpMetadataSource;
pub use source::{MetadataSource, StatusDocument};
