use super::document::SearchDocument;
use super::query::{preprocess_query, validate_query_fields};
use crate::core::archive::StudyHandle;
use crate::core::config::IndexConfig;
use crate::core::error::{DxrayError, Result};
use crate::core::storage::TantivyIndex;
use std::path::Path;

/// Full-text index of studies
///
/// Safe to share between threads. `add` may race with itself and
/// with `search`/`count`; readers observe each commit atomically.
#[derive(Debug)]
pub struct SearchIndex {
    index: TantivyIndex,
    max_results: usize,
}

impl SearchIndex {
    /// Open the index described by `config`
    pub fn open(config: &IndexConfig, max_results: usize) -> Result<Self> {
        if config.is_in_memory() {
            Self::in_memory(max_results)
        } else {
            Self::open_path(&config.path, max_results)
        }
    }

    /// Open a persistent index, initialising an empty one if none exists
    pub fn open_path(path: &Path, max_results: usize) -> Result<Self> {
        Ok(Self {
            index: TantivyIndex::open_or_create(path)?,
            max_results,
        })
    }

    /// Ephemeral in-memory index
    pub fn in_memory(max_results: usize) -> Result<Self> {
        Ok(Self {
            index: TantivyIndex::in_memory()?,
            max_results,
        })
    }

    /// Index a study unless its key is already present
    ///
    /// Returns whether the study was new. Known studies are not
    /// re-read from the archive.
    pub fn add(&self, study: &StudyHandle) -> Result<bool> {
        self.stage(study, 1)
    }

    /// Like `add`, but commits only once `batch_size` studies are pending
    ///
    /// Staged studies are not searchable until the batch fills or
    /// `commit` is called.
    pub fn stage(&self, study: &StudyHandle, batch_size: usize) -> Result<bool> {
        let key = study.key();
        if self.index.contains(&key)? {
            return Ok(false);
        }

        let document = SearchDocument::from_study(study)?;
        self.index.stage_if_absent(&document, batch_size)
    }

    /// Make staged studies searchable
    pub fn commit(&self) -> Result<()> {
        self.index.commit()
    }

    /// Keys matching a free-text query, best match first
    pub fn search(&self, query: &str) -> Result<Vec<String>> {
        let query = preprocess_query(query, false);
        if query.is_empty() {
            return Err(DxrayError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }
        validate_query_fields(&query)?;

        Ok(self
            .index
            .search(&query, self.max_results)?
            .into_iter()
            .map(|(_, key)| key)
            .collect())
    }

    /// Key of the single study whose UID equals `uid`
    pub fn find_by_uid(&self, uid: &str) -> Result<String> {
        let mut keys = self.index.keys_for_uid(uid, 2)?;
        match keys.len() {
            0 => Err(DxrayError::NotFound(format!("Study {uid}"))),
            1 => Ok(keys.remove(0)),
            _ => Err(DxrayError::AmbiguousIdentifier(format!(
                "More than one study has UID {uid}"
            ))),
        }
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        self.index.contains(key)
    }

    /// Number of indexed studies
    pub fn count(&self) -> u64 {
        self.index.num_docs()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}
