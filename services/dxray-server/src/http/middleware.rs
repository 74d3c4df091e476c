//! Request logging for the dxray API.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};

/// Log every request with its route, status and duration
///
/// Server errors go to ERROR, client errors to WARN, the rest to INFO.
pub async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        500.. => error!(%method, %uri, route = %route, status, elapsed_ms, "Request failed"),
        400..=499 => warn!(%method, %uri, route = %route, status, elapsed_ms, "Request rejected"),
        _ => info!(%method, %uri, route = %route, status, elapsed_ms, "Request completed"),
    }

    response
}
