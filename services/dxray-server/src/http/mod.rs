//! HTTP REST adapter
//!
//! Depends only on core/. Serves the study list, search, viewer
//! study, WADO retrieval and scan endpoints via Axum.

pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::core::services::Services;

pub use handlers::*;

/// Build the API router
pub fn router(services: Arc<Services>) -> Router {
    let prefix = services
        .config
        .server
        .api_prefix
        .trim_end_matches('/')
        .to_string();

    Router::new()
        .route("/health", get(health_handler))
        .route(&format!("{prefix}/list"), get(list_handler))
        .route(&format!("{prefix}/search"), get(search_handler))
        .route(&format!("{prefix}/ohif/:study"), get(ohif_handler))
        .route(&format!("{prefix}/wado"), get(wado_handler))
        .route(&format!("{prefix}/scan"), post(scan_handler))
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
