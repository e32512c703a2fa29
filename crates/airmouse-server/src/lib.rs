//! airmouse-server library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does airmouse-server do? (for beginners)
//!
//! The server runs on the computer being controlled.  It opens two UDP
//! endpoints:
//!
//! 1. A **discovery** port that answers `DISCOVER` probes with
//!    `MOUSE_SERVER`, so a phone on the same LAN can find the host without
//!    typing an IP address.
//! 2. A **command** port that receives one text command per datagram
//!    (`MOVE_DELTA:2,-1`, `LEFT_CLICK`, `HOTKEY_ALT_TAB`, ...), parses it
//!    with `airmouse-core`, and injects the matching OS input event.
//!
//! The protocol is fire-and-forget: nothing is ever sent back on the command
//! port, and a bad datagram is logged and dropped.

/// Application layer: the command dispatcher and the injection capability.
pub mod application;

/// Infrastructure layer: OS input backends, UDP listeners, and config storage.
pub mod infrastructure;

/// Startup and shutdown of both listeners as one unit.
pub mod server;
