//! UDP discovery responder.
//!
//! Devices on the LAN broadcast the literal `DISCOVER` to the discovery port
//! (default 5001).  Every matching probe gets exactly one `MOUSE_SERVER`
//! datagram back, sent to the probe's source address.  The device learns the
//! host's IP from the reply's source and then sends commands to the command
//! port.  Anything else arriving on this port is ignored.
//!
//! # How UDP discovery works (for beginners)
//!
//! 1. The device sends a UDP packet to the broadcast address (e.g.
//!    `255.255.255.255:5001`); every host on the subnet receives it.
//! 2. The host running AirMouse recognises the probe and replies by unicast.
//! 3. The device now knows which machine to control.
//!
//! There is no session, handshake, or authentication.

use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use airmouse_core::protocol::{is_discovery_probe, DISCOVERY_REPLY};
use tracing::{debug, info, warn};

use super::{spawn_listener, ListenerError, ListenerHandle, RunningFlag};

/// Binds `addr` and starts the discovery thread.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the socket cannot be bound, and
/// [`ListenerError::Spawn`] if the thread cannot be started.
pub fn start_discovery_responder(
    addr: SocketAddr,
    recv_timeout: Duration,
    running: RunningFlag,
) -> Result<ListenerHandle, ListenerError> {
    let handle = spawn_listener("airmouse-discovery", addr, recv_timeout, running, handle_probe)?;
    info!("discovery responder listening on UDP {}", handle.local_addr());
    Ok(handle)
}

fn handle_probe(socket: &UdpSocket, payload: &[u8], src: SocketAddr) {
    if !is_discovery_probe(payload) {
        debug!(
            "ignoring {} byte datagram on discovery port from {src}",
            payload.len()
        );
        return;
    }
    match socket.send_to(DISCOVERY_REPLY, src) {
        Ok(_) => debug!("answered discovery probe from {src}"),
        Err(e) => warn!("failed to send discovery reply to {src}: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
