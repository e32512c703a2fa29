//! The relay server: both listeners started and stopped as one unit.
//!
//! ```text
//! RelayServer::start()
//!  ├─ discovery responder  (thread "airmouse-discovery")
//!  └─ command listener     (thread "airmouse-command", owns the dispatcher)
//! ```
//!
//! Both threads share one [`RunningFlag`].  [`RelayServer::shutdown`] clears
//! it and joins the threads, which notice within one receive timeout.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::dispatch_command::{CommandDispatcher, InputInjector};
use crate::infrastructure::network::{
    start_command_listener, start_discovery_responder, ListenerError, ListenerHandle, RunningFlag,
};
use crate::infrastructure::storage::config::{ConfigError, ServerConfig};

/// Error returned when the server cannot start.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// A running relay server.
#[derive(Debug)]
pub struct RelayServer {
    running: RunningFlag,
    discovery: ListenerHandle,
    command: ListenerHandle,
}

impl RelayServer {
    /// Binds both endpoints and starts their threads.
    ///
    /// If the command endpoint fails to bind, the already-running discovery
    /// responder is stopped before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for an unusable bind address and
    /// [`ServerError::Listener`] if either socket cannot be bound.
    pub fn start(
        config: &ServerConfig,
        injector: Arc<dyn InputInjector>,
    ) -> Result<Self, ServerError> {
        let net = &config.network;
        let command_addr = net.command_addr()?;
        let discovery_addr = net.discovery_addr()?;
        let running = RunningFlag::new();

        let discovery =
            start_discovery_responder(discovery_addr, net.recv_timeout(), running.clone())?;

        let dispatcher = CommandDispatcher::new(injector, &config.motion);
        let command = match start_command_listener(
            command_addr,
            net.recv_timeout(),
            dispatcher,
            running.clone(),
        ) {
            Ok(handle) => handle,
            Err(e) => {
                running.stop();
                discovery.join();
                return Err(e.into());
            }
        };

        info!(
            "relay server up: commands on {}, discovery on {}",
            command.local_addr(),
            discovery.local_addr()
        );
        Ok(Self {
            running,
            discovery,
            command,
        })
    }

    pub fn command_addr(&self) -> SocketAddr {
        self.command.local_addr()
    }

    pub fn discovery_addr(&self) -> SocketAddr {
        self.discovery.local_addr()
    }

    /// A clone of the shared flag; stopping it stops the server.
    pub fn running_flag(&self) -> RunningFlag {
        self.running.clone()
    }

    /// Stops both listeners and blocks until their threads have exited.
    ///
    /// Returns `false` if either thread panicked.
    pub fn shutdown(self) -> bool {
        self.running.stop();
        let command_ok = self.command.join();
        let discovery_ok = self.discovery.join();
        info!("relay server stopped");
        command_ok && discovery_ok
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
