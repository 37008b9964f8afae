//! Common test utilities and fixtures
#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use liveradio::PlayerConfig;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialize test logging (call once per test module)
pub fn init_logging() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::from_default_env().add_directive("liveradio=debug".parse().unwrap());

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Create a test configuration with short intervals
pub fn test_config(metadata_url: Option<String>) -> PlayerConfig {
    PlayerConfig::builder()
        .poll_interval(Duration::from_millis(100))
        .request_timeout(Duration::from_secs(2))
        .build()
        .map(|config| PlayerConfig {
            metadata_url,
            ..config
        })
        .unwrap()
}

/// Wait until the published state satisfies `predicate`
pub async fn wait_for_state(
    player: &liveradio::RadioPlayer,
    predicate: impl FnMut(&liveradio::PlaybackState) -> bool,
) -> liveradio::PlaybackState {
    let mut rx = player.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for player state")
        .expect("player task gone")
        .clone()
}
