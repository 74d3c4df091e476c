//! Viewer projections of archived studies.
//!
//! Turns study handles into the JSON tree the web viewer consumes and
//! resolves WADO retrievals to object files. Transport concerns stay
//! out: retrieval URLs come from a caller supplied builder.

mod ohif;
mod tags;
mod wado;

pub use ohif::{project_study, OhifResponse, SeriesJson, StudyJson};
pub use tags::{lower_camel, DicomTagReader, TagMap, TagReader};
pub use wado::{
    resolve_object, thumbnail_path, validate_request, WadoContentType, WadoObject,
    WadoUrlBuilder, DICOM_MIME, JPEG_MIME,
};
