//! Scanner: enumerates the studies of an archive.
//!
//! A scan runs on its own producer thread and hands studies to the
//! consumer through a bounded channel, so the producer never runs
//! more than one element ahead. Every call starts a fresh producer.
//!
//! Order is volume listing order, then study listing order within
//! each volume. Listing or opening errors end the stream with that
//! error; cancellation ends it quietly.

mod cancel;

pub use cancel::CancellationToken;

use crate::core::archive::{Archive, StudyHandle, Volume};
use crate::core::error::{DxrayError, Result};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

/// Studies buffered between producer and consumer
const HANDOFF_CAPACITY: usize = 1;

/// What a scan covers
#[derive(Debug, Clone)]
enum Target {
    Archive,
    Volume(String),
    VolumeIndex(u32),
}

/// Produces study sequences for an archive
#[derive(Debug, Clone)]
pub struct Scanner {
    archive: Archive,
}

impl Scanner {
    pub fn new(archive: Archive) -> Self {
        Self { archive }
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Scan every study of every listed volume
    pub fn scan(&self, cancel: &CancellationToken) -> StudyStream {
        self.spawn(Target::Archive, cancel)
    }

    /// Scan the studies of one volume by name
    pub fn scan_volume(&self, name: &str, cancel: &CancellationToken) -> StudyStream {
        self.spawn(Target::Volume(name.to_string()), cancel)
    }

    /// Scan the studies of one volume by index
    pub fn scan_volume_by_index(&self, index: u32, cancel: &CancellationToken) -> StudyStream {
        self.spawn(Target::VolumeIndex(index), cancel)
    }

    fn spawn(&self, target: Target, cancel: &CancellationToken) -> StudyStream {
        let (tx, rx) = mpsc::sync_channel(HANDOFF_CAPACITY);
        let archive = self.archive.clone();
        let producer_cancel = cancel.clone();

        let spawned = thread::Builder::new()
            .name("dxray-scanner".to_string())
            .spawn(move || produce(&archive, &target, &producer_cancel, &tx));

        match spawned {
            Ok(worker) => StudyStream {
                rx: Some(rx),
                cancel: cancel.clone(),
                worker: Some(worker),
                pending_error: None,
            },
            Err(e) => StudyStream {
                rx: None,
                cancel: cancel.clone(),
                worker: None,
                pending_error: Some(DxrayError::IoError(e)),
            },
        }
    }
}

fn produce(
    archive: &Archive,
    target: &Target,
    cancel: &CancellationToken,
    tx: &SyncSender<Result<StudyHandle>>,
) {
    let result = match target {
        Target::Archive => {
            archive.for_each_volume(|volume| produce_volume(&volume, cancel, tx))
        }
        Target::Volume(name) => archive
            .open_volume(name)
            .and_then(|volume| produce_volume(&volume, cancel, tx)),
        Target::VolumeIndex(index) => archive
            .open_volume_by_index(*index)
            .and_then(|volume| produce_volume(&volume, cancel, tx)),
    };

    match result {
        Ok(()) | Err(DxrayError::Cancelled) => {}
        Err(e) => {
            // Consumer may already be gone
            let _ = tx.send(Err(e));
        }
    }
}

fn produce_volume(
    volume: &Volume,
    cancel: &CancellationToken,
    tx: &SyncSender<Result<StudyHandle>>,
) -> Result<()> {
    volume.for_each_study(|study| {
        cancel.check()?;
        tx.send(Ok(study)).map_err(|_| DxrayError::Cancelled)
    })
}

/// Lazy sequence of studies from one scan
///
/// The cancellation token is checked before every element. Dropping
/// the stream stops the producer and waits for it to exit.
pub struct StudyStream {
    rx: Option<Receiver<Result<StudyHandle>>>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
    pending_error: Option<DxrayError>,
}

impl Iterator for StudyStream {
    type Item = Result<StudyHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending_error.take() {
            return Some(Err(err));
        }

        if self.cancel.is_cancelled() {
            self.finish();
            return None;
        }

        let item = self.rx.as_ref()?.recv().ok();
        match item {
            Some(Err(e)) => {
                self.finish();
                Some(Err(e))
            }
            Some(ok) => Some(ok),
            None => {
                self.finish();
                None
            }
        }
    }
}

impl StudyStream {
    fn finish(&mut self) {
        // Closing the channel unblocks a producer waiting on send
        self.rx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Scanner thread panicked");
            }
        }
    }
}

impl Drop for StudyStream {
    fn drop(&mut self) {
        self.finish();
    }
}
