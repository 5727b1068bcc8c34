//! Colorbar image endpoint handler.
//!
//! Returns a PNG rendering of a colormap as a horizontal colorbar.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::error_response;
use crate::colormaps::colorbar::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Query parameters for image endpoint
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    /// Image width in pixels
    pub width: Option<u32>,
    /// Image height in pixels
    pub height: Option<u32>,
    /// Whether to draw the under/over colors at the ends
    pub extend: Option<bool>,
}

/// Handle GET /colormaps/:name/image requests
pub async fn image_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<ImageQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();
    let endpoint = "/colormaps/:name/image";

    debug!(
        endpoint = endpoint,
        request_id = %request_id,
        colormap = %name,
        width = ?params.width,
        height = ?params.height,
        extend = ?params.extend,
        "Processing image request"
    );

    match generate_image_response(&state, &name, &params) {
        Ok(bytes) => {
            info!(
                endpoint = endpoint,
                request_id = %request_id,
                colormap = %name,
                bytes = bytes.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Image generation successful"
            );
            ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
        }
        Err(error) => error_response(error, endpoint, &request_id),
    }
}

/// Helper function to render and encode the colorbar
fn generate_image_response(state: &AppState, name: &str, params: &ImageQuery) -> Result<Vec<u8>> {
    let colormap = state.get_colormap_checked(name)?;
    let img = colorbar::render_colorbar(
        colormap,
        params.width.unwrap_or(DEFAULT_WIDTH),
        params.height.unwrap_or(DEFAULT_HEIGHT),
        params.extend.unwrap_or(false),
    )?;
    colorbar::encode_png(&img)
}
