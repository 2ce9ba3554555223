//! Pressbox server assembly.
//!
//! Provides a reusable serve function so the binary and the integration
//! tests share one code path.

#![deny(missing_docs)]

mod health;
mod logger;

use std::{net::SocketAddr, sync::Arc};

use anyhow::anyhow;
use config::Config;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tools::ToolContext;

/// Configuration for serving pressbox.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to.
    pub listen_address: SocketAddr,
    /// The loaded configuration.
    pub config: Config,
    /// Cancellation token for graceful shutdown.
    pub shutdown_signal: CancellationToken,
    /// Log filter string (e.g. "info" or "server=debug,tools=debug").
    pub log_filter: String,
    /// The version string to log on startup.
    pub version: String,
    /// Optional oneshot sender reporting the bound address (useful when
    /// port 0 was specified, as the integration tests do).
    pub bound_addr_sender: Option<tokio::sync::oneshot::Sender<SocketAddr>>,
}

/// Starts and runs the server with the provided configuration.
pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        shutdown_signal,
        log_filter,
        version,
        bound_addr_sender,
    }: ServeConfig,
) -> anyhow::Result<()> {
    logger::init(&log_filter);

    log::info!("Pressbox {version}");

    let ctx = Arc::new(ToolContext::new(&config));
    let mut app = tools::router(ctx);

    if config.server.health.enabled {
        app = app.merge(health::router(&config.server.health.path));
    }

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    let bound = listener.local_addr()?;

    if let Some(sender) = bound_addr_sender
        && sender.send(bound).is_err()
    {
        log::warn!("Nobody listening for the bound address");
    }

    log::info!("JSON-RPC endpoint: http://{bound}/mcp");

    if config.server.health.enabled {
        log::info!("Liveness endpoint: http://{bound}{}", config.server.health.path);
    }

    tokio::select! {
        result = axum::serve(listener, app) => {
            result.map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;
        }
        _ = shutdown_signal.cancelled() => {
            log::info!("Received shutdown signal, shutting down gracefully...");
        }
    }

    Ok(())
}
