//! Unified service container for dxray
//!
//! Provides shared access to the archive, the search index and the
//! indexing pipeline. The HTTP and CLI adapters both go through it.

use crate::core::archive::{Archive, StudyHandle, Volume};
use crate::core::config::Config;
use crate::core::error::{DxrayError, Result};
use crate::core::indexer::StudyIndexer;
use crate::core::projection::{
    project_study, resolve_object, validate_request, DicomTagReader, OhifResponse, StudyJson,
    TagReader, WadoObject,
};
use crate::core::scan::{CancellationToken, Scanner};
use crate::core::search::SearchIndex;
use crate::core::types::{HealthResponse, ListQuery, ScanStats, VolumeSummary, WadoRequest};
use std::cmp::Ordering;
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Read-only view of the archive
    pub archive: Archive,

    /// Scanner and search index
    pub indexer: Arc<StudyIndexer>,

    /// Reader for per-instance DICOM tags
    pub tags: Arc<dyn TagReader>,
}

impl Services {
    /// Create services from configuration, opening the search index
    pub fn new(config: Config) -> Result<Self> {
        let archive = Archive::open(&config.archive);
        let index = SearchIndex::open(&config.index, config.search.max_results)?;
        Ok(Self::with_parts(
            config,
            archive,
            index,
            Arc::new(DicomTagReader),
        ))
    }

    /// Assemble services from already opened parts
    pub fn with_parts(
        config: Config,
        archive: Archive,
        index: SearchIndex,
        tags: Arc<dyn TagReader>,
    ) -> Self {
        let indexer = StudyIndexer::new(
            Scanner::new(archive.clone()),
            Arc::new(index),
            &config.index,
        );
        Self {
            config: Arc::new(config),
            archive,
            indexer: Arc::new(indexer),
            tags,
        }
    }

    pub fn index(&self) -> &Arc<SearchIndex> {
        self.indexer.index()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            indexed_studies: self.index().count(),
        }
    }

    /// Page through the archive, newest study first
    ///
    /// Studies are projected without DICOM tags. Pagination spans
    /// volumes.
    pub fn list_studies<F>(&self, query: &ListQuery, urls: &F) -> Result<Vec<StudyJson>>
    where
        F: Fn(&str, &str, &str) -> String + ?Sized,
    {
        let limit = non_negative(
            "limit",
            query
                .limit
                .unwrap_or(self.config.search.default_list_limit as i64),
        )?;
        let mut skip = non_negative("offset", query.offset.unwrap_or(0))?;

        let mut out = Vec::new();
        if limit == 0 {
            return Ok(out);
        }

        for volume in self.volumes_newest_first()? {
            let mut studies = volume.list_studies()?;
            if skip >= studies.len() {
                skip -= studies.len();
                continue;
            }

            studies.sort_by(|a, b| newest_first(a.index(), a.name(), b.index(), b.name()));
            for study in studies.iter().skip(skip).take(limit - out.len()) {
                out.push(project_study(study, urls, None)?);
            }
            skip = 0;

            if out.len() >= limit {
                break;
            }
        }

        Ok(out)
    }

    /// Full-text search, best match first
    ///
    /// Hits that can no longer be opened or projected are skipped.
    pub fn search_studies<F>(&self, query: &str, urls: &F) -> Result<Vec<StudyJson>>
    where
        F: Fn(&str, &str, &str) -> String + ?Sized,
    {
        let keys = self.index().search(query)?;
        let mut out = Vec::with_capacity(keys.len());

        for key in keys {
            let projected = self
                .archive
                .open_study_by_key(&key)
                .and_then(|study| project_study(&study, urls, None));
            match projected {
                Ok(study) => out.push(study),
                Err(e) => tracing::warn!(key = %key, error = %e, "Skipping search hit"),
            }
        }

        Ok(out)
    }

    /// Look up a study by its UID
    pub fn find_study(&self, uid: &str) -> Result<StudyHandle> {
        let key = self.index().find_by_uid(uid)?;
        self.archive.open_study_by_key(&key)
    }

    /// Single study in the viewer model, with DICOM tags
    pub fn ohif_study<F>(&self, uid: &str, urls: &F) -> Result<OhifResponse>
    where
        F: Fn(&str, &str, &str) -> String + ?Sized,
    {
        let study = self.find_study(uid)?;
        let projected = project_study(&study, urls, Some(self.tags.as_ref()))?;
        Ok(OhifResponse {
            studies: vec![projected],
        })
    }

    /// Resolve and read the object a WADO request names
    pub fn wado(&self, request: &WadoRequest) -> Result<WadoObject> {
        let content_type = validate_request(request)?;
        let study = self.find_study(&request.study_uid)?;
        let path = resolve_object(
            &study,
            &request.series_uid,
            &request.object_uid,
            content_type,
        )?;
        let bytes = self.archive.read_object(&path)?;

        Ok(WadoObject {
            path,
            content_type,
            bytes,
        })
    }

    /// Scan the archive now
    pub fn full_scan(&self, cancel: &CancellationToken) -> Result<ScanStats> {
        self.indexer.full_scan(cancel)
    }

    /// Scan one volume now
    pub fn scan_volume(&self, name: &str, cancel: &CancellationToken) -> Result<ScanStats> {
        self.indexer.scan_volume(name, cancel)
    }

    /// Volumes with their study counts, newest first
    pub fn volume_summaries(&self) -> Result<Vec<VolumeSummary>> {
        self.volumes_newest_first()?
            .into_iter()
            .map(|volume| {
                Ok(VolumeSummary {
                    studies: volume.count_studies()?,
                    index: volume.index(),
                    name: volume.name().to_string(),
                })
            })
            .collect()
    }

    fn volumes_newest_first(&self) -> Result<Vec<Volume>> {
        let mut volumes = self.archive.list_volumes()?;
        volumes.sort_by(|a, b| newest_first(a.index(), a.name(), b.index(), b.name()));
        Ok(volumes)
    }
}

/// Higher index first, then name descending; unindexed names last
fn newest_first(a_index: Option<u32>, a_name: &str, b_index: Option<u32>, b_name: &str) -> Ordering {
    match (a_index, b_index) {
        (Some(a), Some(b)) => b.cmp(&a).then_with(|| b_name.cmp(a_name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b_name.cmp(a_name),
    }
}

fn non_negative(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| DxrayError::InvalidQuery(format!("{name} must not be negative")))
}
