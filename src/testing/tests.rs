use super::*;
use crate::audio::{
    AudioOutput, AudioOutputError, OutputEvent, OutputEvents, OutputReport, SourceId,
};
use crate::control::Volume;
use crate::metadata::MetadataSource;

#[tokio::test]
async fn test_mock_output_records_calls() {
    let (mut output, handle) = MockOutput::with_behavior(PlayBehavior::Succeed);
    let (events, _rx) = OutputEvents::channel();

    output.subscribe(events);
    output.attach(SourceId::new(7), "http://radio.test/stream").unwrap();
    output.set_volume(Volume::from_percent(30)).unwrap();
    output.play().await.unwrap();
    output.pause();
    output.detach();

    assert_eq!(
        handle.calls(),
        vec![
            OutputCall::Subscribe,
            OutputCall::Attach("http://radio.test/stream".into()),
            OutputCall::SetVolume(Volume::from_percent(30)),
            OutputCall::Play,
            OutputCall::Pause,
            OutputCall::Detach,
        ]
    );
    assert_eq!(handle.attached(), None);
    assert_eq!(handle.attached_source(), None);
    assert_eq!(handle.last_source(), Some(SourceId::new(7)));
    assert_eq!(handle.play_count(), 1);
}

#[tokio::test]
async fn test_mock_output_manual_play() {
    let (mut output, handle) = MockOutput::new();

    let first = output.play();
    let second = output.play();
    assert_eq!(handle.pending_plays(), 2);

    drop(first);
    assert_eq!(handle.pending_plays(), 1);

    assert!(handle.resolve_play(Err(AudioOutputError::PlayRejected("nope".into()))));
    assert_eq!(
        second.await,
        Err(AudioOutputError::PlayRejected("nope".into()))
    );
    assert!(!handle.resolve_play(Ok(())));
}

#[tokio::test]
async fn test_mock_output_events() {
    let (mut output, handle) = MockOutput::new();
    assert!(!handle.emit_from(SourceId::new(1), OutputEvent::Playing));

    let (events, mut rx) = OutputEvents::channel();
    output.subscribe(events);
    // Nothing attached yet
    assert!(!handle.emit(OutputEvent::Playing));

    output.attach(SourceId::new(1), "http://radio.test/a").unwrap();
    output.detach();
    output.attach(SourceId::new(2), "http://radio.test/b").unwrap();

    assert!(handle.emit(OutputEvent::Stalled));
    assert!(handle.emit_from(SourceId::new(1), OutputEvent::Error("late".into())));
    assert_eq!(
        rx.recv().await,
        Some(OutputReport {
            source: SourceId::new(2),
            event: OutputEvent::Stalled,
        })
    );
    assert_eq!(
        rx.recv().await,
        Some(OutputReport {
            source: SourceId::new(1),
            event: OutputEvent::Error("late".into()),
        })
    );
}

#[tokio::test]
async fn test_mock_output_attach_failure() {
    let (mut output, handle) = MockOutput::new();
    handle.fail_next_attach(AudioOutputError::AttachFailed("bad codec".into()));

    assert!(output.attach(SourceId::new(1), "http://radio.test/a").is_err());
    assert_eq!(handle.last_source(), None);
    assert!(output.attach(SourceId::new(2), "http://radio.test/b").is_ok());
    assert_eq!(handle.attached().as_deref(), Some("http://radio.test/b"));
    assert_eq!(handle.attached_source(), Some(SourceId::new(2)));
}

#[tokio::test]
async fn test_mock_source_script() {
    let source = MockSource::scripted([MockResponse::Title("A - B".into())]);
    source.push(MockResponse::Status(500));

    assert_eq!(source.fetch_title().await.unwrap().as_deref(), Some("A - B"));
    assert!(source.fetch_title().await.is_err());
    assert_eq!(source.fetch_title().await.unwrap(), None);
    assert_eq!(source.fetch_count(), 3);
}

#[test]
fn test_mock_output_manual_play_stays_pending() {
    let (mut output, handle) = MockOutput::new();
    let mut play = tokio_test::task::spawn(output.play());

    tokio_test::assert_pending!(play.poll());
    assert!(handle.resolve_play(Ok(())));
    assert!(play.is_woken());
    tokio_test::assert_ready_eq!(play.poll(), Ok(()));
}

#[tokio::test]
async fn test_output_event_helpers_stamp_source() {
    let (events, mut rx) = OutputEvents::channel();
    let source = SourceId::new(3);

    events.playing(source);
    events.stalled(source);
    events.error(source, "decode error");
    drop(events);

    let mut received = Vec::new();
    while let Some(report) = rx.recv().await {
        assert_eq!(report.source, source);
        received.push(report.event);
    }
    assert_eq!(
        received,
        vec![
            OutputEvent::Playing,
            OutputEvent::Stalled,
            OutputEvent::Error("decode error".into()),
        ]
    );
}
