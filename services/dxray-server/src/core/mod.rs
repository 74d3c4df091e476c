//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of transport protocols (HTTP, CLI).
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Request and response data structures
//! - **xdg**: XDG directory handling
//! - **archive**: Volumes, studies and object paths of the archive
//! - **descriptor**: Study descriptor decoding
//! - **scan**: Cancellable enumeration of every study
//! - **storage**: Tantivy index management
//! - **search**: Study documents and full-text queries
//! - **indexer**: On-demand and periodic scans into the index
//! - **projection**: Viewer JSON and WADO retrieval
//! - **services**: Unified service container

pub mod archive;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod indexer;
pub mod projection;
pub mod scan;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DxrayError, Result};
pub use services::Services;
