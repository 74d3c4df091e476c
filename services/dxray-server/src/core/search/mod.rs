//! Search Index: full-text search over study documents.
//!
//! Each study is flattened into one `SearchDocument` keyed by
//! `<volume>/<study>` and stored in a Tantivy index. Insertion is
//! idempotent: adding a key that is already indexed is a no-op.

mod document;
mod index;
mod query;

pub use document::SearchDocument;
pub use index::SearchIndex;
pub use query::{preprocess_query, validate_query_fields, VALID_FIELDS};
