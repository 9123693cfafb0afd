//! Integration tests for room resolution driven by startup configuration.

use std::collections::HashMap;

use roomcall_core::{AppConfig, Capabilities, RoomResolver, SessionState};

fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(move |key| map.get(key).cloned()).unwrap()
}

/// The documented examples for room URL validation.
#[test]
fn test_documented_room_examples() {
    let resolver = AppConfig::default().resolver().unwrap();

    assert!(resolver.validate(Some("https://foo.example-provider.com/room1")));
    assert!(!resolver.validate(Some("https://foo.example-provider.com/room1/")));
    assert!(!resolver.validate(Some("https://example-provider.com/room1")));
}

/// A configured domain flows through to the resolver.
#[test]
fn test_configured_domain() {
    let config = config_from(&[("ROOMCALL_ROOM_DOMAIN", "calls.internal")]);
    let resolver = config.resolver().unwrap();

    assert_eq!(resolver.domain(), "calls.internal");
    assert!(resolver.validate(Some("https://ops.calls.internal/weekly")));
}

/// With a backend configured, the landing step never blocks.
#[test]
fn test_backend_enables_proceed() {
    let config = config_from(&[("ROOMCALL_BASE_URL", "http://localhost:7860")]);
    let caps = Capabilities::resolve(&config, None);
    let resolver = config.resolver().unwrap();

    assert!(resolver.can_proceed(&caps, None));
    assert!(resolver.can_proceed(&caps, Some("garbage")));
}

/// Forcing manual entry puts validation back in charge.
#[test]
fn test_forced_manual_entry_requires_valid_room() {
    let config = config_from(&[
        ("ROOMCALL_BASE_URL", "http://localhost:7860"),
        ("ROOMCALL_MANUAL_ROOM_ENTRY", "true"),
    ]);
    let caps = Capabilities::resolve(&config, None);
    let resolver = RoomResolver::new(&config.room_domain).unwrap();

    assert!(!caps.auto_room_creation);
    assert!(!resolver.can_proceed(&caps, Some("https://foo.example-provider.com/room1/")));
    assert!(resolver.can_proceed(&caps, Some("https://foo.example-provider.com/room1")));
}

/// Only states produced by transitions exist.
#[test]
fn test_state_labels() {
    let labels: Vec<_> = [
        SessionState::Idle,
        SessionState::Configuring,
        SessionState::RequestingAgent,
        SessionState::Connecting,
        SessionState::Connected,
        SessionState::Error,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(
        labels,
        ["idle", "configuring", "requesting_agent", "connecting", "connected", "error"]
    );
}
