//! End-to-end tests for the relay server over real loopback UDP.
//!
//! # Purpose
//!
//! These tests start a full [`RelayServer`] bound to `127.0.0.1` on
//! OS-assigned ports, with a [`RecordingInjector`] in place of the OS
//! backend.  A plain `UdpSocket` plays the role of the phone.  They verify:
//!
//! - Commands arriving over UDP reach the injector scaled, signed and routed
//!   the same way the dispatcher unit tests expect.
//! - A malformed datagram is dropped without disturbing later ones.
//! - Discovery answers `DISCOVER` exactly once and ignores everything else.
//! - Shutdown completes promptly with both threads joined.
//!
//! ```text
//! test client                      RelayServer
//! ───────────                      ───────────
//! send "SET_SCALE:2.0"      ──►    command thread → dispatcher
//! send "MOVE_DELTA:1,1"     ──►    → RecordingInjector: Move(2, 2)
//! send "DISCOVER"           ──►    discovery thread
//!                           ◄──    "MOUSE_SERVER"
//! ```
//!
//! Delivery on loopback is reliable in practice; each test still polls the
//! injector with a deadline rather than assuming instant arrival.

use std::net::UdpSocket;
use std::sync::Arc;
use std::time::{Duration, Instant};

use airmouse_core::MouseButton;
use airmouse_server::infrastructure::input_injection::mock::{InjectedEvent, RecordingInjector};
use airmouse_server::infrastructure::storage::config::ServerConfig;
use airmouse_server::server::RelayServer;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn loopback_config() -> ServerConfig {
    let mut cfg = ServerConfig::default();
    cfg.network.bind_address = "127.0.0.1".into();
    cfg.network.command_port = 0;
    cfg.network.discovery_port = 0;
    cfg.network.recv_timeout_ms = 50;
    cfg
}

fn start_server(cfg: &ServerConfig) -> (RelayServer, Arc<RecordingInjector>, UdpSocket) {
    let inj = Arc::new(RecordingInjector::new());
    let server = RelayServer::start(cfg, inj.clone()).expect("start relay server");
    let client = UdpSocket::bind("127.0.0.1:0").expect("bind client");
    client
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    (server, inj, client)
}

fn send_all(client: &UdpSocket, server: &RelayServer, lines: &[&str]) {
    for line in lines {
        client
            .send_to(line.as_bytes(), server.command_addr())
            .expect("send command");
    }
}

fn wait_for_events(inj: &RecordingInjector, count: usize) -> Vec<InjectedEvent> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let events = inj.events();
        if events.len() >= count || Instant::now() >= deadline {
            return events;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

// ── Command channel ───────────────────────────────────────────────────────────

#[test]
fn test_set_scale_then_move_delta_over_udp() {
    // Arrange
    let (server, inj, client) = start_server(&loopback_config());

    // Act
    send_all(&client, &server, &["SET_SCALE:2.0", "MOVE_DELTA:1,1"]);
    let events = wait_for_events(&inj, 1);

    // Assert
    assert_eq!(events, vec![InjectedEvent::Move { dx: 2.0, dy: 2.0 }]);
    assert!(server.shutdown());
}

#[test]
fn test_set_scale_then_move_delta_with_single_entry_smoothing() {
    // Arrange: a 1-entry history averages over just the current delta
    let mut cfg = loopback_config();
    cfg.motion.smoothing = true;
    cfg.motion.history_len = 1;
    let (server, inj, client) = start_server(&cfg);

    // Act
    send_all(&client, &server, &["SET_SCALE:2.0", "MOVE_DELTA:1,1"]);
    let events = wait_for_events(&inj, 1);

    // Assert
    assert_eq!(events, vec![InjectedEvent::Move { dx: 2.0, dy: 2.0 }]);
    assert!(server.shutdown());
}

#[test]
fn test_negative_scale_inverts_motion_over_udp() {
    let (server, inj, client) = start_server(&loopback_config());

    send_all(&client, &server, &["SET_SCALE:-1", "MOVE_DELTA:2,3", "MOVE_DELTA:-4,0"]);
    wait_for_events(&inj, 2);

    assert_eq!(inj.moves(), vec![(-2.0, -3.0), (4.0, 0.0)]);
    assert!(server.shutdown());
}

#[test]
fn test_scroll_commands_use_signed_step() {
    let (server, inj, client) = start_server(&loopback_config());

    send_all(&client, &server, &["SCROLL_UP", "SCROLL_DOWN"]);
    wait_for_events(&inj, 2);

    assert_eq!(inj.scrolls(), vec![100, -100]);
    assert!(server.shutdown());
}

#[test]
fn test_malformed_command_does_not_block_next_one() {
    // Arrange
    let (server, inj, client) = start_server(&loopback_config());

    // Act
    send_all(
        &client,
        &server,
        &["MOVE_DELTA:abc", "BOGUS", "", "SET_SCALE:nan", "LEFT_CLICK"],
    );
    let events = wait_for_events(&inj, 1);

    // Assert
    assert_eq!(events, vec![InjectedEvent::Click(MouseButton::Left)]);
    assert!(server.shutdown());
}

#[test]
fn test_dead_zone_motion_is_not_injected() {
    let (server, inj, client) = start_server(&loopback_config());

    // 0.1 * 1.6667 is below 0.5 on both axes; the click acts as a marker.
    send_all(&client, &server, &["MOVE_DELTA:0.1,-0.1", "RIGHT_CLICK"]);
    let events = wait_for_events(&inj, 1);

    assert_eq!(events, vec![InjectedEvent::Click(MouseButton::Right)]);
    assert!(server.shutdown());
}

#[test]
fn test_press_and_release_reach_injector_in_order() {
    let (server, inj, client) = start_server(&loopback_config());

    send_all(&client, &server, &["LEFT_DOWN", "MOVE_DELTA:3,0", "LEFT_UP"]);
    let events = wait_for_events(&inj, 3);

    assert_eq!(events.len(), 3);
    assert_eq!(events[0], InjectedEvent::Press(MouseButton::Left));
    assert!(matches!(events[1], InjectedEvent::Move { .. }));
    assert_eq!(events[2], InjectedEvent::Release(MouseButton::Left));
    assert!(server.shutdown());
}

// ── Hotkeys ───────────────────────────────────────────────────────────────────

#[test]
fn test_hotkey_routing_over_udp() {
    // Arrange
    let (server, inj, client) = start_server(&loopback_config());

    // Act: HOTKEY_ carries no keys and must be dropped without side effects
    send_all(
        &client,
        &server,
        &["HOTKEY_", "HOTKEY_CTRL_C", "HOTKEY_ALT_TAB", "HOTKEY_ENTER"],
    );
    let events = wait_for_events(&inj, 3);

    // Assert
    assert_eq!(
        events,
        vec![
            InjectedEvent::InterruptChord,
            InjectedEvent::Chord(vec!["alt".to_string(), "tab".to_string()]),
            InjectedEvent::Tap("enter".to_string()),
        ]
    );
    assert!(server.shutdown());
}

// ── Discovery ─────────────────────────────────────────────────────────────────

#[test]
fn test_discover_gets_exactly_one_reply() {
    // Arrange
    let (server, _inj, client) = start_server(&loopback_config());
    let mut buf = [0u8; 64];

    // Act
    client
        .send_to(b"DISCOVER", server.discovery_addr())
        .unwrap();
    let (len, from) = client.recv_from(&mut buf).expect("discovery reply");
    let second = client.recv_from(&mut buf);

    // Assert
    assert_eq!(&buf[..len], b"MOUSE_SERVER");
    assert_eq!(from, server.discovery_addr());
    assert!(second.is_err(), "only one reply per probe");
    assert!(server.shutdown());
}

#[test]
fn test_non_probe_payload_gets_no_reply() {
    let (server, _inj, client) = start_server(&loopback_config());
    let mut buf = [0u8; 64];

    client
        .send_to(b"MOUSE_SERVER", server.discovery_addr())
        .unwrap();

    assert!(client.recv_from(&mut buf).is_err());
    assert!(server.shutdown());
}

#[test]
fn test_command_port_never_replies() {
    let (server, inj, client) = start_server(&loopback_config());
    let mut buf = [0u8; 64];

    send_all(&client, &server, &["DISCOVER", "LEFT_CLICK"]);
    wait_for_events(&inj, 1);

    assert!(client.recv_from(&mut buf).is_err());
    assert!(server.shutdown());
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[test]
fn test_shutdown_completes_within_receive_timeout() {
    // Arrange
    let (server, _inj, _client) = start_server(&loopback_config());
    let started = Instant::now();

    // Act
    let clean = server.shutdown();

    // Assert: 50 ms timeout per loop, generous margin for slow CI
    assert!(clean);
    assert!(started.elapsed() < Duration::from_secs(2));
}
