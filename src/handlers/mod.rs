//! HTTP request handlers for the gibs-colormaps API.
//!
//! This module contains all the endpoint handlers for the web server and the
//! router wiring them together.

pub mod image;
pub mod metadata;

pub use image::image_handler;
pub use metadata::{color_handler, colormap_handler, list_handler, samples_handler};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::GibsError;
use crate::logging::{create_http_trace_layer, log_request_error};
use crate::state::AppState;

/// Build the read-only API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/colormaps", get(list_handler))
        .route("/colormaps/:name", get(colormap_handler))
        .route("/colormaps/:name/color", get(color_handler))
        .route("/colormaps/:name/samples", get(samples_handler))
        .route("/colormaps/:name/image", get(image_handler))
        .layer(CorsLayer::permissive())
        .layer(create_http_trace_layer())
        .with_state(state)
}

/// Log a failed request and turn it into a JSON error response
pub(crate) fn error_response(error: GibsError, endpoint: &str, request_id: &str) -> Response {
    log_request_error(&error, endpoint, request_id, None);

    let status = match &error {
        GibsError::ColormapNotFound { .. } => StatusCode::NOT_FOUND,
        GibsError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}
