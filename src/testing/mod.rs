//! Test doubles for the player's collaborators

/// Scriptable audio output
pub mod mock_output;
/// Scripted metadata source
pub mod mock_source;
#[cfg(test)]
mod tests;

pub use mock_output::{MockOutput, MockOutputHandle, OutputCall, PlayBehavior};
pub use mock_source::{MockResponse, MockSource};
