//! Full and per-volume scans.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

use crate::core::config::IndexConfig;
use crate::core::error::{DxrayError, Result};
use crate::core::scan::{CancellationToken, Scanner, StudyStream};
use crate::core::search::SearchIndex;
use crate::core::types::ScanStats;

/// Studies staged before the index is committed during a scan
const COMMIT_BATCH: usize = 64;

/// Drives the scanner into the search index
///
/// Only one scan runs at a time; a scan requested while another is
/// running fails with `ScanInProgress`. New studies are committed in
/// batches and become searchable batch by batch.
#[derive(Debug)]
pub struct StudyIndexer {
    scanner: Scanner,
    index: Arc<SearchIndex>,
    progress_every: usize,
    progress_after: Duration,
    scan_lock: Mutex<()>,
}

impl StudyIndexer {
    pub fn new(scanner: Scanner, index: Arc<SearchIndex>, config: &IndexConfig) -> Self {
        Self {
            scanner,
            index,
            progress_every: config.progress_every.max(1),
            progress_after: Duration::from_secs(config.progress_after_secs),
            scan_lock: Mutex::new(()),
        }
    }

    pub fn index(&self) -> &Arc<SearchIndex> {
        &self.index
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Scan the whole archive and index every study not yet indexed
    pub fn full_scan(&self, cancel: &CancellationToken) -> Result<ScanStats> {
        let _guard = self.begin()?;
        tracing::info!("Starting full archive scan");
        self.drain(self.scanner.scan(cancel))
    }

    /// Scan and index a single volume
    pub fn scan_volume(&self, name: &str, cancel: &CancellationToken) -> Result<ScanStats> {
        let _guard = self.begin()?;
        tracing::info!(volume = %name, "Starting volume scan");
        self.drain(self.scanner.scan_volume(name, cancel))
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>> {
        match self.scan_lock.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(DxrayError::ScanInProgress),
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        }
    }

    fn drain(&self, studies: StudyStream) -> Result<ScanStats> {
        let start = Instant::now();
        let mut stats = ScanStats::default();

        let drained = self.index_all(studies, &mut stats, start);
        // Staged studies are kept even when the scan stops early
        let committed = self.index.commit();
        drained?;
        committed?;

        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            total = stats.total,
            new = stats.new,
            known = stats.known,
            failed = stats.failed,
            duration_ms = stats.duration_ms,
            "Scan finished"
        );

        Ok(stats)
    }

    fn index_all(&self, studies: StudyStream, stats: &mut ScanStats, start: Instant) -> Result<()> {
        for study in studies {
            let study = study?;
            stats.total += 1;

            match self.index.stage(&study, COMMIT_BATCH) {
                Ok(true) => stats.new += 1,
                Ok(false) => stats.known += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!(
                        volume = %study.volume_name(),
                        study = %study.name(),
                        error = %e,
                        "Failed to index study"
                    );
                }
            }

            if stats.total % self.progress_every == 0 && start.elapsed() > self.progress_after {
                tracing::info!(
                    volume = %study.volume_name(),
                    study = %study.name(),
                    elapsed_secs = start.elapsed().as_secs(),
                    "Scanned {} studies so far",
                    stats.total
                );
            }
        }
        Ok(())
    }
}
