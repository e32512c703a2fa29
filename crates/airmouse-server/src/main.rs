//! AirMouse server entry point.
//!
//! ```text
//! main()
//!  ├─ load_config()          -- TOML file, defaults on any problem
//!  ├─ tracing subscriber     -- RUST_LOG, else [logging] level
//!  ├─ platform_injector()    -- OS input backend (fatal if missing)
//!  ├─ RelayServer::start()   -- discovery + command threads (fatal if bind fails)
//!  └─ wait for Ctrl-C / SIGTERM, then stop and join both threads
//! ```

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use airmouse_server::infrastructure::input_injection::platform_injector;
use airmouse_server::infrastructure::storage::config::{self, ServerConfig};
use airmouse_server::server::RelayServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is not up yet, so a config problem is reported after init.
    let (config, config_problem) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (ServerConfig::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("AirMouse server {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_problem {
        warn!("ignoring config file, using defaults: {e}");
    }

    let injector = platform_injector(&config.injection)
        .context("no usable input injection backend")?;

    let server = RelayServer::start(&config, injector)
        .context("failed to start relay server")?;
    info!("ready; press Ctrl-C to exit");

    shutdown_signal().await;
    info!("shutdown signal received");

    // Joining blocks for up to one receive timeout.
    let clean = tokio::task::spawn_blocking(move || server.shutdown())
        .await
        .context("shutdown task failed")?;
    if !clean {
        warn!("a listener thread panicked during shutdown");
    }
    info!("shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
