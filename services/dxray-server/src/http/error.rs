//! HTTP mapping of core errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::DxrayError;

/// Status code an error is reported with
pub fn status_code(err: &DxrayError) -> StatusCode {
    match err {
        DxrayError::NotFound(_) => StatusCode::NOT_FOUND,
        DxrayError::InvalidEntry(_)
        | DxrayError::AmbiguousIdentifier(_)
        | DxrayError::InvalidQuery(_)
        | DxrayError::ConfigError(_) => StatusCode::BAD_REQUEST,
        DxrayError::UnsupportedContentType(_) => StatusCode::NOT_ACCEPTABLE,
        DxrayError::ScanInProgress => StatusCode::CONFLICT,
        DxrayError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        DxrayError::ParseError(_)
        | DxrayError::IndexUnavailable(_)
        | DxrayError::IoError(_)
        | DxrayError::SerdeError(_)
        | DxrayError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for DxrayError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let message = self.message();

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
