//! WADO style object retrieval.

use crate::core::archive::StudyHandle;
use crate::core::error::{DxrayError, Result};
use crate::core::types::WadoRequest;
use std::path::PathBuf;

pub const DICOM_MIME: &str = "application/dicom";
pub const JPEG_MIME: &str = "image/jpeg";

const REQUEST_TYPE: &str = "WADO";
const OBJECT_PREFIX: &str = "I_";
const THUMBNAIL_PREFIX: &str = "S128_";
const OBJECT_EXTENSION: &str = ".dcm";
const THUMBNAIL_EXTENSION: &str = ".jpg";

/// Representation requested by a retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadoContentType {
    /// The original object file
    Dicom,
    /// The pre-rendered thumbnail next to it
    Jpeg,
}

impl WadoContentType {
    /// Parse the optional `contentType` parameter, absent means DICOM
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some(DICOM_MIME) => Ok(Self::Dicom),
            Some(JPEG_MIME) => Ok(Self::Jpeg),
            Some(other) => Err(DxrayError::UnsupportedContentType(other.to_string())),
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Dicom => DICOM_MIME,
            Self::Jpeg => JPEG_MIME,
        }
    }
}

/// Bytes of a retrieved object
#[derive(Debug, Clone)]
pub struct WadoObject {
    pub path: PathBuf,
    pub content_type: WadoContentType,
    pub bytes: Vec<u8>,
}

/// Check a request before any lookup, returning the content type
///
/// Content type is checked first, then the three UIDs, then the
/// request type.
pub fn validate_request(request: &WadoRequest) -> Result<WadoContentType> {
    let content_type = WadoContentType::parse(request.content_type.as_deref())?;

    let missing: Vec<&str> = [
        ("studyUID", &request.study_uid),
        ("seriesUID", &request.series_uid),
        ("objectUID", &request.object_uid),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        return Err(DxrayError::InvalidQuery(format!(
            "Missing parameters: {}",
            missing.join(", ")
        )));
    }

    if request.request_type != REQUEST_TYPE {
        return Err(DxrayError::InvalidQuery(format!(
            "Unsupported requestType '{}'",
            request.request_type
        )));
    }

    Ok(content_type)
}

/// Thumbnail path for an object path
///
/// Only the file name changes: a leading `I_` becomes `S128_` and a
/// trailing `.dcm` becomes `.jpg`.
pub fn thumbnail_path(raw: &str) -> String {
    let split = raw.rfind(&['/', '\\'][..]).map_or(0, |i| i + 1);
    let (dir, file) = raw.split_at(split);

    let file = match file.strip_prefix(OBJECT_PREFIX) {
        Some(rest) => format!("{THUMBNAIL_PREFIX}{rest}"),
        None => file.to_string(),
    };
    let file = match file.strip_suffix(OBJECT_EXTENSION) {
        Some(stem) => format!("{stem}{THUMBNAIL_EXTENSION}"),
        None => file,
    };

    format!("{dir}{file}")
}

/// Local path of the requested object within a study
pub fn resolve_object(
    study: &StudyHandle,
    series_uid: &str,
    object_uid: &str,
    content_type: WadoContentType,
) -> Result<PathBuf> {
    let model = study.load()?;
    let series = model
        .series(series_uid)
        .ok_or_else(|| DxrayError::NotFound(format!("Series {series_uid}")))?;
    let instance = series
        .instance(object_uid)
        .ok_or_else(|| DxrayError::NotFound(format!("Instance {object_uid}")))?;

    let raw = match content_type {
        WadoContentType::Dicom => instance.data.dicom.clone(),
        WadoContentType::Jpeg => thumbnail_path(&instance.data.dicom),
    };
    Ok(study.archive().resolve_object_path(&raw))
}

/// Builds the retrieval URLs handed to the viewer
#[derive(Debug, Clone)]
pub struct WadoUrlBuilder {
    host: String,
    api_prefix: String,
}

impl WadoUrlBuilder {
    pub fn new(host: impl Into<String>, api_prefix: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_prefix: api_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// `dicomweb://<host><prefix>/wado?objectUID=..&requestType=WADO&seriesUID=..&studyUID=..`
    pub fn build(&self, study_uid: &str, series_uid: &str, object_uid: &str) -> String {
        let query = serde_urlencoded::to_string([
            ("objectUID", object_uid),
            ("requestType", REQUEST_TYPE),
            ("seriesUID", series_uid),
            ("studyUID", study_uid),
        ])
        .unwrap_or_default();
        format!("dicomweb://{}{}/wado?{query}", self.host, self.api_prefix)
    }
}
