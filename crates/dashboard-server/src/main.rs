//! Dashboard Server - Main entry point

use anyhow::Result;
use dashboard_common::logging::{init_logging, LogConfig};
use dashboard_common::store::{RedisStore, Store, StoreConfig};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing::info;

use dashboard_server::{config::Config, routes::create_router, serve::serve};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::for_binary("dashboard-server")
        .directive("dashboard_server=debug")
        .directive("tower_http=debug")
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    info!("Starting genome dashboard server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let store_config = StoreConfig::from_env()?;
    let store = RedisStore::connect(&store_config).await?;
    info!("Store client initialized");

    let app = create_router(Arc::new(store.clone()), &config);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
    serve(listener, app, shutdown_signal(), grace).await?;

    store.close().await?;
    info!("Server shut down gracefully");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
