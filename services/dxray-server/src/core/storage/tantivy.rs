//! Tantivy integration for the study index.
//!
//! This module wraps Tantivy operations for creating, opening,
//! inserting into and querying the study index.

use crate::core::error::{DxrayError, Result};
use crate::core::search::SearchDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{Query, QueryParser, TermQuery};
use tantivy::schema::*;
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

/// Current schema version
/// Version 1: key, owner, patient, race, id, uid, date, description
pub const SCHEMA_VERSION: u32 = 1;

/// Sidecar file describing a persistent index
pub const MANIFEST_FILE: &str = "dxray-index.json";

/// Writer heap size
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Create the Tantivy schema for study documents
///
/// Fields:
/// - key: `<volume>/<study>` document key (STRING | STORED)
/// - owner, patient, race, id, date, description: free text (TEXT)
/// - uid: study instance UID, exact match only (STRING)
pub fn create_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_text_field("key", STRING | STORED);

    builder.add_text_field("owner", TEXT);
    builder.add_text_field("patient", TEXT);
    builder.add_text_field("race", TEXT);
    builder.add_text_field("id", TEXT);
    builder.add_text_field("uid", STRING);
    builder.add_text_field("date", TEXT);
    builder.add_text_field("description", TEXT);

    builder.build()
}

/// Metadata stored next to a persistent index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct Fields {
    key: Field,
    owner: Field,
    patient: Field,
    race: Field,
    id: Field,
    uid: Field,
    date: Field,
    description: Field,
}

impl Fields {
    fn resolve(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema.get_field(name).map_err(|e| {
                DxrayError::IndexUnavailable(format!("Missing {name} field: {e}"))
            })
        };

        Ok(Self {
            key: field("key")?,
            owner: field("owner")?,
            patient: field("patient")?,
            race: field("race")?,
            id: field("id")?,
            uid: field("uid")?,
            date: field("date")?,
            description: field("description")?,
        })
    }

    fn searchable(&self) -> Vec<Field> {
        vec![
            self.owner,
            self.patient,
            self.race,
            self.id,
            self.uid,
            self.date,
            self.description,
        ]
    }
}

/// Tantivy index wrapper
///
/// Writes are serialised behind the writer lock. Staged documents are
/// tracked by key until the next commit so duplicate detection covers
/// them too. Searches only see committed documents; the reader is
/// reloaded after every commit.
pub struct TantivyIndex {
    index: Index,
    fields: Fields,
    writer: Mutex<WriterState>,
    reader: IndexReader,
}

struct WriterState {
    writer: IndexWriter,
    /// Keys added since the last commit
    pending: HashSet<String>,
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("schema", &"<schema>")
            .finish()
    }
}

impl TantivyIndex {
    /// Create an ephemeral in-memory index
    pub fn in_memory() -> Result<Self> {
        Self::from_index(Index::create_in_ram(create_schema()))
    }

    /// Open the index at `index_dir`, creating an empty one if none exists
    pub fn open_or_create(index_dir: &Path) -> Result<Self> {
        if index_dir.join("meta.json").exists() {
            Self::open(index_dir)
        } else {
            Self::create(index_dir)
        }
    }

    /// Create a new Tantivy index at the given path
    pub fn create(index_dir: &Path) -> Result<Self> {
        fs::create_dir_all(index_dir)?;

        let index = Index::create_in_dir(index_dir, create_schema())
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to create index: {e}")))?;

        let manifest = IndexManifest {
            schema_version: SCHEMA_VERSION,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(index_dir.join(MANIFEST_FILE), json)?;

        tracing::info!(path = %index_dir.display(), "Created study index");
        Self::from_index(index)
    }

    /// Open an existing Tantivy index
    pub fn open(index_dir: &Path) -> Result<Self> {
        let manifest = Self::read_manifest(index_dir)?;
        if manifest.schema_version != SCHEMA_VERSION {
            return Err(DxrayError::IndexUnavailable(format!(
                "Index at {} uses schema v{}, this build needs v{}. \
                 Delete the directory to rebuild it.",
                index_dir.display(),
                manifest.schema_version,
                SCHEMA_VERSION
            )));
        }

        let index = Index::open_in_dir(index_dir)
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to open index: {e}")))?;

        Self::from_index(index)
    }

    /// Read the sidecar manifest of a persistent index
    pub fn read_manifest(index_dir: &Path) -> Result<IndexManifest> {
        let path = index_dir.join(MANIFEST_FILE);
        let contents = fs::read_to_string(&path).map_err(|e| {
            DxrayError::IndexUnavailable(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn from_index(index: Index) -> Result<Self> {
        let fields = Fields::resolve(&index.schema())?;

        let writer = index
            .writer_with_num_threads(1, WRITER_HEAP_BYTES)
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to create writer: {e}")))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to create reader: {e}")))?;

        Ok(Self {
            index,
            fields,
            writer: Mutex::new(WriterState {
                writer,
                pending: HashSet::new(),
            }),
            reader,
        })
    }

    /// Whether a document with `key` has been committed or staged
    pub fn contains(&self, key: &str) -> Result<bool> {
        // Pending is cleared only after the reader sees the commit
        if self.lock_writer().pending.contains(key) {
            return Ok(true);
        }
        self.is_committed(key)
    }

    /// Insert a document unless its key is already present, and commit
    ///
    /// Returns `true` if the document was inserted.
    pub fn insert_if_absent(&self, document: &SearchDocument) -> Result<bool> {
        self.stage_if_absent(document, 1)
    }

    /// Stage a document unless its key is already present
    ///
    /// Commits once `batch_size` documents are pending. Returns `true` if
    /// the document was staged.
    pub fn stage_if_absent(&self, document: &SearchDocument, batch_size: usize) -> Result<bool> {
        let mut state = self.lock_writer();

        // Another writer may have inserted it since the caller checked
        if state.pending.contains(&document.key) || self.is_committed(&document.key)? {
            return Ok(false);
        }

        let f = &self.fields;
        state
            .writer
            .add_document(doc!(
                f.key => document.key.as_str(),
                f.owner => document.owner.as_str(),
                f.patient => document.patient.as_str(),
                f.race => document.race.as_str(),
                f.id => document.id.as_str(),
                f.uid => document.uid.as_str(),
                f.date => document.date.as_str(),
                f.description => document.description.as_str(),
            ))
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to add document: {e}")))?;
        state.pending.insert(document.key.clone());

        if state.pending.len() >= batch_size {
            self.commit_locked(&mut state)?;
        }

        Ok(true)
    }

    /// Commit staged documents and make them searchable
    pub fn commit(&self) -> Result<()> {
        let mut state = self.lock_writer();
        if state.pending.is_empty() {
            return Ok(());
        }
        self.commit_locked(&mut state)
    }

    fn commit_locked(&self, state: &mut WriterState) -> Result<()> {
        state
            .writer
            .commit()
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to commit: {e}")))?;

        self.reader
            .reload()
            .map_err(|e| DxrayError::IndexUnavailable(format!("Failed to reload reader: {e}")))?;

        state.pending.clear();
        Ok(())
    }

    fn lock_writer(&self) -> std::sync::MutexGuard<'_, WriterState> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_committed(&self, key: &str) -> Result<bool> {
        Ok(self.count_term(self.fields.key, key)? > 0)
    }

    /// Number of committed documents
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Free-text search over all document fields, best match first
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<(f32, String)>> {
        let parser = QueryParser::for_index(&self.index, self.fields.searchable());
        let query = parser
            .parse_query(query_str)
            .map_err(|e| DxrayError::InvalidQuery(format!("Failed to parse query: {e}")))?;

        self.top_keys(query.as_ref(), limit)
    }

    /// Keys of up to `limit` documents whose UID equals `uid`
    pub fn keys_for_uid(&self, uid: &str, limit: usize) -> Result<Vec<String>> {
        let query = self.term_query(self.fields.uid, uid);
        Ok(self
            .top_keys(&query, limit)?
            .into_iter()
            .map(|(_, key)| key)
            .collect())
    }

    fn term_query(&self, field: Field, value: &str) -> TermQuery {
        TermQuery::new(
            Term::from_field_text(field, value),
            IndexRecordOption::Basic,
        )
    }

    fn count_term(&self, field: Field, value: &str) -> Result<usize> {
        let query = self.term_query(field, value);
        self.reader
            .searcher()
            .search(&query, &Count)
            .map_err(|e| DxrayError::IndexUnavailable(format!("Search failed: {e}")))
    }

    fn top_keys(&self, query: &dyn Query, limit: usize) -> Result<Vec<(f32, String)>> {
        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(query, &TopDocs::with_limit(limit))
            .map_err(|e| DxrayError::IndexUnavailable(format!("Search failed: {e}")))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| {
                DxrayError::IndexUnavailable(format!("Failed to retrieve document: {e}"))
            })?;
            let key = doc
                .get_first(self.fields.key)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            results.push((score, key));
        }

        Ok(results)
    }
}
