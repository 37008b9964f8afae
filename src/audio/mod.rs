//! Audio output capability consumed by the player

pub mod output;

pub use output::{
    AudioOutput, AudioOutputError, OutputEvent, OutputEvents, OutputReport, PlayFuture, SourceId,
};
