//! Network infrastructure: the two blocking UDP listeners.
//!
//! - `discovery` – answers `DISCOVER` probes so devices can find the host.
//! - `command_listener` – feeds command datagrams to the dispatcher.
//!
//! Each listener owns one `std::net::UdpSocket` on a dedicated OS thread.
//! Sockets carry a read timeout so every loop re-checks the shared
//! [`RunningFlag`] at least once per timeout and exits promptly on shutdown.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use airmouse_core::protocol::MAX_DATAGRAM_SIZE;
use thiserror::Error;
use tracing::{debug, error, info};

pub mod command_listener;
pub mod discovery;

pub use command_listener::start_command_listener;
pub use discovery::start_discovery_responder;

/// Pause after a hard receive error so a persistently failing socket does
/// not spin the thread.
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Error type for listener start-up.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The UDP socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The socket was bound but could not be configured.
    #[error("failed to configure socket on {addr}: {source}")]
    Socket {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The listener thread could not be spawned.
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Shared run/stop switch observed by every listener loop.
///
/// Cloning shares the flag.  Once stopped it stays stopped.
#[derive(Debug, Clone)]
pub struct RunningFlag(Arc<AtomicBool>);

impl RunningFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Asks every loop holding a clone of this flag to exit.
    pub fn stop(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Default for RunningFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// A running listener thread and the address it is bound to.
#[derive(Debug)]
pub struct ListenerHandle {
    local_addr: SocketAddr,
    thread: JoinHandle<()>,
}

impl ListenerHandle {
    /// The bound address; differs from the requested one when port 0 was used.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Blocks until the listener thread exits.
    ///
    /// Returns `false` if the thread panicked.
    pub fn join(self) -> bool {
        let name = self.thread.thread().name().unwrap_or("listener").to_string();
        match self.thread.join() {
            Ok(()) => true,
            Err(_) => {
                error!("{name} thread panicked");
                false
            }
        }
    }
}

/// Binds `addr` and applies the receive timeout.
fn bind_socket(addr: SocketAddr, recv_timeout: Duration) -> Result<UdpSocket, ListenerError> {
    let socket = UdpSocket::bind(addr).map_err(|source| ListenerError::BindFailed { addr, source })?;
    socket
        .set_read_timeout(Some(recv_timeout))
        .map_err(|source| ListenerError::Socket { addr, source })?;
    Ok(socket)
}

/// Binds a socket and runs `on_datagram` for every packet on a new thread
/// named `name` until `running` is cleared.
fn spawn_listener<F>(
    name: &'static str,
    addr: SocketAddr,
    recv_timeout: Duration,
    running: RunningFlag,
    mut on_datagram: F,
) -> Result<ListenerHandle, ListenerError>
where
    F: FnMut(&UdpSocket, &[u8], SocketAddr) + Send + 'static,
{
    let socket = bind_socket(addr, recv_timeout)?;
    let local_addr = socket
        .local_addr()
        .map_err(|source| ListenerError::Socket { addr, source })?;

    let thread = std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
            while running.is_running() {
                match socket.recv_from(&mut buf) {
                    Ok((len, src)) => on_datagram(&socket, &buf[..len], src),
                    Err(e) if is_timeout_error(&e) => {}
                    // Windows reports an ICMP port-unreachable for an earlier
                    // send as a reset on the next receive.
                    Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                        debug!("{name}: ignoring connection reset: {e}");
                    }
                    Err(e) => {
                        error!("{name}: recv error: {e}");
                        std::thread::sleep(RECV_ERROR_BACKOFF);
                    }
                }
            }
            info!("{name} stopped");
        })
        .map_err(ListenerError::Spawn)?;

    Ok(ListenerHandle { local_addr, thread })
}

/// Returns `true` for OS timeout / would-block errors that should be retried.
pub fn is_timeout_error(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
