//! Core data types for the dxray service.
//!
//! Request parameters, scan statistics and response bodies shared
//! by the HTTP and CLI adapters.

use serde::{Deserialize, Serialize};

/// Statistics from a full scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Studies produced by the scanner
    pub total: usize,

    /// Studies added to the index by this scan
    pub new: usize,

    /// Studies that were already indexed
    pub known: usize,

    /// Studies that could not be indexed
    pub failed: usize,

    /// Scan duration in milliseconds
    pub duration_ms: u64,
}

/// Pagination parameters of `list`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Parameters of `search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Parameters of a WADO retrieval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WadoRequest {
    #[serde(rename = "requestType", default)]
    pub request_type: String,

    #[serde(rename = "studyUID", default)]
    pub study_uid: String,

    #[serde(rename = "seriesUID", default)]
    pub series_uid: String,

    #[serde(rename = "objectUID", default)]
    pub object_uid: String,

    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub indexed_studies: u64,
}

/// Summary of one archive volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub name: String,
    pub index: Option<u32>,
    pub studies: usize,
}
