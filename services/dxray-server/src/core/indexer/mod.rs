//! Indexing Pipeline: feeds scanned studies into the search index.
//!
//! A full scan drains the scanner and adds every study to the index.
//! Failures to index a single study are logged and counted, while a
//! failure to enumerate the archive aborts the scan. Scans can be
//! triggered on demand or repeated by the periodic worker.

pub mod pipeline;
pub mod worker;

pub use pipeline::StudyIndexer;
pub use worker::spawn_periodic;
