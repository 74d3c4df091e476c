//! Background worker repeating full scans on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::StudyIndexer;
use crate::core::scan::CancellationToken;

/// Spawn the periodic rescan worker
///
/// The first rescan happens one `interval` after the call. Scans run
/// on the blocking pool. Cancelling `shutdown` cancels a running scan
/// and stops the worker without waiting for the next tick.
pub fn spawn_periodic(
    indexer: Arc<StudyIndexer>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Scanning archive every {}s", interval.as_secs());

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.cancelled() => break,
            }

            let scanner = Arc::clone(&indexer);
            let cancel = shutdown.clone();
            match tokio::task::spawn_blocking(move || scanner.full_scan(&cancel)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) if e.is_conflict() => {
                    tracing::debug!("Skipping periodic scan, another scan is running");
                }
                Ok(Err(e)) => tracing::error!(error = %e, "Periodic scan failed"),
                Err(e) => tracing::error!(error = %e, "Periodic scan task failed"),
            }
        }

        tracing::info!("Periodic scan worker stopped");
    })
}
