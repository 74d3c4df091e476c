//! dxray - DX-R radiography archive indexer
//!
//! Indexes the studies of a DX-R archive (a read-only tree of volume
//! and study directories with an XML descriptor per study) with
//! Tantivy, and serves them to DICOM web viewers: a paginated study
//! list, full-text search, an OHIF study tree and WADO retrieval.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - archive (volumes, studies, object paths)
//!   - descriptor (study.xml decoding)
//!   - scan, indexer (cancellable scans, periodic rescans)
//!   - storage, search (Tantivy index, queries)
//!   - projection (viewer JSON, DICOM tags, WADO)
//!   - services (unified service container)
//!
//! - **http**: REST API adapter (depends on core)
//!   - handlers, middleware, error mapping
//!
//! - **cli**: command-line adapter (depends on core, mounts http)

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP REST adapter
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DxrayError, Result};
pub use core::services::Services;
pub use core::types::*;
