use super::container::*;
use super::events::*;
use crate::control::volume::Volume;
use crate::types::{PlaybackState, PlaybackStatus, TrackInfo};

#[test]
fn test_state_update() {
    let container = StateContainer::default();

    assert!(container.set_volume(Volume::from_percent(50)));
    assert_eq!(container.get().volume.as_percent(), 50);
    assert_eq!(container.volume().as_percent(), 50);
}

#[test]
fn test_unchanged_update_reports_false() {
    let container = StateContainer::default();

    assert!(!container.set_status(PlaybackStatus::Idle));
    assert!(container.set_status(PlaybackStatus::Connecting));
    assert!(!container.set_status(PlaybackStatus::Connecting));
}

#[tokio::test]
async fn test_state_subscription() {
    let container = StateContainer::new(PlaybackState::new(
        Volume::DEFAULT,
        TrackInfo::new("Web Rádio", "Figueiró • Portugal"),
    ));
    let mut rx = container.subscribe();

    // Initial state
    assert_eq!(rx.borrow().now_playing.artist, "Web Rádio");

    container.set_now_playing(TrackInfo::new("DJ Durval", "Night Grooves"));

    // Receiver should have the updated state
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().now_playing.title, "Night Grooves");
}

#[tokio::test]
async fn test_unchanged_update_does_not_notify() {
    let container = StateContainer::default();
    let rx = container.subscribe();

    container.set_volume(Volume::DEFAULT);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_event_bus() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();

    bus.emit(PlayerEvent::VolumeChanged {
        volume: Volume::from_percent(50),
    });

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        PlayerEvent::VolumeChanged {
            volume: Volume::from_percent(50)
        }
    );
}
