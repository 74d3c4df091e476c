//! Serve command - run the HTTP API

use crate::core::indexer::spawn_periodic;
use crate::core::scan::CancellationToken;
use crate::core::services::Services;
use crate::http;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address, overrides server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port, overrides server.port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Execute the serve command
///
/// Runs a full scan first; the server only starts once it succeeded.
pub async fn execute(
    args: ServeArgs,
    services: &Arc<Services>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    config.log_config();

    let initial = Arc::clone(services);
    let stats =
        tokio::task::spawn_blocking(move || initial.full_scan(&CancellationToken::new())).await??;
    tracing::info!(
        "Initial scan indexed {} new studies ({} total)",
        stats.new,
        services.index().count()
    );

    let shutdown = CancellationToken::new();
    let worker = match config.index.scan_interval_secs {
        0 => {
            tracing::info!("Periodic rescans disabled");
            None
        }
        secs => Some(spawn_periodic(
            Arc::clone(&services.indexer),
            Duration::from_secs(secs),
            shutdown.clone(),
        )),
    };

    let addr = format!(
        "{}:{}",
        args.host.as_deref().unwrap_or(&config.server.host),
        args.port.unwrap_or(config.server.port)
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    let app = http::router(Arc::clone(services));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Some(worker) = worker {
        worker.await?;
    }

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
    shutdown.cancel();
}
