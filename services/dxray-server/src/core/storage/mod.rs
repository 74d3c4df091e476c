//! Storage layer for the Tantivy study index.
//!
//! # Index Directory Structure
//!
//! ```text
//! {index.path}/
//! ├── dxray-index.json    # Schema version and creation time
//! ├── meta.json           # Tantivy metadata
//! └── [segment files]
//! ```
//!
//! `index.path = ":memory:"` keeps the index in RAM instead.

mod tantivy;

pub use self::tantivy::{create_schema, IndexManifest, TantivyIndex, MANIFEST_FILE, SCHEMA_VERSION};
