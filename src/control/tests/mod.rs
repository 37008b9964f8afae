
use super::playback::{PlayAttempt, PlaybackController};
use crate::audio::{OutputEvent, SourceId};
use crate::testing::{MockOutput, MockOutputHandle};
use crate::types::PlayerConfig;

fn controller() -> (PlaybackController<MockOutput>, MockOutputHandle) {
    controller_with(&PlayerConfig::default())
}

fn controller_with(config: &PlayerConfig) -> (PlaybackController<MockOutput>, MockOutputHandle) {
    let (output, handle) = MockOutput::new();
    let controller = PlaybackController::new(output, config).unwrap();
    (controller, handle)
}

/// Deliver `event` as raised by the attached source, if any
fn report(
    controller: &mut PlaybackController<MockOutput>,
    event: OutputEvent,
) -> Option<PlayAttempt> {
    let source = controller.attached_source().unwrap_or(SourceId::new(0));
    controller.handle_output_event(source, event)
}

#[test]
fn test_controller_creation() {
    let (controller, handle) = controller();

    let state = controller.state();
    assert_eq!(state.status, crate::types::PlaybackStatus::Idle);
    assert_eq!(state.volume, super::Volume::DEFAULT);
    assert_eq!(state.now_playing, PlayerConfig::default().placeholder);
    assert_eq!(state.last_error, None);
    assert_eq!(controller.pending_attempt(), None);
    assert_eq!(controller.attached_url(), None);
    assert_eq!(controller.attached_source(), None);
    // Creating a controller touches nothing
    assert!(handle.calls().is_empty());
}

#[test]
fn test_invalid_stream_url() {
    let (output, _handle) = MockOutput::new();
    let config = PlayerConfig {
        stream_url: "::not a url::".into(),
        ..PlayerConfig::default()
    };
    assert!(PlaybackController::new(output, &config).is_err());
}
