//! HTTP request handlers for the dxray API
//!
//! Every core call touches the filesystem or the index, so handlers
//! run it on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::{DxrayError, Result};
use crate::core::projection::{OhifResponse, StudyJson, WadoUrlBuilder};
use crate::core::scan::CancellationToken;
use crate::core::services::Services;
use crate::core::types::*;

/// Run a blocking core call off the async runtime
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        DxrayError::IoError(std::io::Error::other(format!("Blocking task failed: {e}")))
    })?
}

/// Retrieval URL builder for the host the client reached us on
fn url_builder(services: &Services, headers: &HeaderMap) -> WadoUrlBuilder {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| services.config.server.bind_addr());
    WadoUrlBuilder::new(host, services.config.server.api_prefix.as_str())
}

/// Health check handler
///
/// Returns server status, version and the number of indexed studies.
pub async fn health_handler(State(services): State<Arc<Services>>) -> Json<HealthResponse> {
    Json(services.health())
}

/// List studies handler
///
/// `GET <prefix>/list?limit=&offset=`, newest study first.
pub async fn list_handler(
    State(services): State<Arc<Services>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StudyJson>>> {
    let urls = url_builder(&services, &headers);
    let studies =
        blocking(move || services.list_studies(&query, &|s, se, i| urls.build(s, se, i))).await?;
    Ok(Json(studies))
}

/// Search handler
///
/// `GET <prefix>/search?q=`
///
/// # Errors
///
/// - `InvalidQuery`: query is empty or names an unknown field
pub async fn search_handler(
    State(services): State<Arc<Services>>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<StudyJson>>> {
    let urls = url_builder(&services, &headers);
    let studies = blocking(move || {
        services.search_studies(&query.q, &|s, se, i| urls.build(s, se, i))
    })
    .await?;
    Ok(Json(studies))
}

/// Viewer study handler
///
/// `GET <prefix>/ohif/:study` returns `{"studies": [..]}` with the
/// DICOM tags of every instance.
///
/// # Errors
///
/// - `NotFound`: no study has the UID
/// - `AmbiguousIdentifier`: more than one study has the UID
pub async fn ohif_handler(
    State(services): State<Arc<Services>>,
    headers: HeaderMap,
    Path(study): Path<String>,
) -> Result<Json<OhifResponse>> {
    let urls = url_builder(&services, &headers);
    let response =
        blocking(move || services.ohif_study(&study, &|s, se, i| urls.build(s, se, i))).await?;
    Ok(Json(response))
}

/// WADO retrieval handler
///
/// `GET <prefix>/wado?requestType=WADO&studyUID=..&seriesUID=..&objectUID=..[&contentType=..]`
///
/// # Errors
///
/// - `UnsupportedContentType` (406): content type other than DICOM or JPEG
/// - `InvalidQuery` (400): missing UIDs or request type not `WADO`
/// - `NotFound` (404): unknown study, series or instance
pub async fn wado_handler(
    State(services): State<Arc<Services>>,
    Query(request): Query<WadoRequest>,
) -> Result<Response> {
    let object = blocking(move || services.wado(&request)).await?;
    Ok((
        [(header::CONTENT_TYPE, object.content_type.mime())],
        object.bytes,
    )
        .into_response())
}

/// On-demand scan handler
///
/// `POST <prefix>/scan` runs a full scan and returns its statistics.
///
/// # Errors
///
/// - `ScanInProgress` (409): another scan is running
pub async fn scan_handler(State(services): State<Arc<Services>>) -> Result<Json<ScanStats>> {
    let stats = blocking(move || services.full_scan(&CancellationToken::new())).await?;
    Ok(Json(stats))
}
