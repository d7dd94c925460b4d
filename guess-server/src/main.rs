use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use guess_core::{AdminGate, LocalClock, PlayerStore};
use guess_persistence::{PlayerRepository, connection::connect_and_migrate};
use guess_server::{Services, config::Config, create_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting guess ledger server...");

    let config = Config::from_env()?;

    // Initialize database connection and run migrations
    let db = connect_and_migrate(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let store: Arc<dyn PlayerStore> =
        Arc::new(PlayerRepository::with_timeout(db, config.store_timeout));

    if config.admin_id.is_none() {
        warn!("ADMIN_ID is not set; admin corrections will be refused");
    }

    let services = Services::new(
        store,
        Arc::new(LocalClock),
        AdminGate::new(config.admin_id.clone()),
    );
    let routes = create_routes(services);

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST: {}", config.host))?;

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((ip, config.port), shutdown_signal())
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    // Wait for SIGINT (Ctrl+C) or SIGTERM
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};

        match (
            unix_signal(SignalKind::interrupt()),
            unix_signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
                return;
            }
            _ => warn!("Could not install unix signal handlers, falling back to Ctrl+C"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(err) => {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await
        }
    }
}
