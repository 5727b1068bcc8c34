//! Catalog metadata endpoint handlers.
//!
//! Lists the served colormaps, returns a colormap's curve data, answers
//! point queries against a colormap and samples it at even spacing.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::error_response;
use crate::colormaps::colormap::to_rgba8;
use crate::colormaps::Colormap;
use crate::error::GibsError;
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Response for the colormap listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub count: usize,
    pub colormaps: Vec<String>,
}

/// Query parameters for the color endpoint
#[derive(Debug, Deserialize)]
pub struct ColorQuery {
    /// Normalized position; values outside 0..=1 hit the under/over colors
    pub position: f64,
}

/// Response for a color query
#[derive(Debug, Serialize, Deserialize)]
pub struct ColorResponse {
    pub colormap: String,
    pub position: f64,
    pub rgba: [u8; 4],
}

/// Default and largest sample counts for the samples endpoint
pub const DEFAULT_SAMPLES: usize = 16;
pub const MAX_SAMPLES: usize = 4096;

/// Query parameters for the samples endpoint
#[derive(Debug, Deserialize)]
pub struct SamplesQuery {
    pub count: Option<usize>,
}

/// Evenly spaced colors over 0..=1, as RGBA bytes
#[derive(Debug, Serialize, Deserialize)]
pub struct SamplesResponse {
    pub colormap: String,
    pub count: usize,
    pub colors: Vec<[u8; 4]>,
}

/// Handle GET /colormaps requests
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/colormaps",
        request_id = %request_id,
        "Processing list request"
    );

    let colormaps: Vec<String> = state.catalog.names().map(str::to_string).collect();

    info!(
        endpoint = "/colormaps",
        request_id = %request_id,
        duration_us = start_time.elapsed().as_micros() as u64,
        colormap_count = colormaps.len(),
        "List request successful"
    );

    Json(ListResponse {
        count: colormaps.len(),
        colormaps,
    })
}

/// Handle GET /colormaps/:name requests
pub async fn colormap_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let request_id = generate_request_id();
    let endpoint = "/colormaps/:name";

    match state.get_colormap_checked(&name) {
        Ok(colormap) => {
            info!(
                endpoint = endpoint,
                request_id = %request_id,
                colormap = %name,
                breakpoints = colormap.segments.len(),
                "Colormap request successful"
            );
            Json(colormap).into_response()
        }
        Err(error) => error_response(error, endpoint, &request_id),
    }
}

/// Handle GET /colormaps/:name/color requests
pub async fn color_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<ColorQuery>,
) -> Response {
    let request_id = generate_request_id();
    let endpoint = "/colormaps/:name/color";

    if !params.position.is_finite() {
        let error = GibsError::InvalidParameter {
            param: "position".to_string(),
            message: "must be a finite number".to_string(),
        };
        return error_response(error, endpoint, &request_id);
    }

    match state.get_colormap_checked(&name) {
        Ok(colormap) => {
            let rgba = colormap.map_normalized(params.position);
            debug!(
                endpoint = endpoint,
                request_id = %request_id,
                colormap = %name,
                position = params.position,
                "Color request successful"
            );
            Json(ColorResponse {
                colormap: name,
                position: params.position,
                rgba,
            })
            .into_response()
        }
        Err(error) => error_response(error, endpoint, &request_id),
    }
}

/// Handle GET /colormaps/:name/samples requests
pub async fn samples_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<SamplesQuery>,
) -> Response {
    let request_id = generate_request_id();
    let endpoint = "/colormaps/:name/samples";

    let count = params.count.unwrap_or(DEFAULT_SAMPLES);
    if count == 0 || count > MAX_SAMPLES {
        let error = GibsError::InvalidParameter {
            param: "count".to_string(),
            message: format!("must be between 1 and {}, got {}", MAX_SAMPLES, count),
        };
        return error_response(error, endpoint, &request_id);
    }

    match state.get_colormap_checked(&name) {
        Ok(colormap) => {
            let colors: Vec<[u8; 4]> =
                colormap.sample(count).into_iter().map(to_rgba8).collect();
            debug!(
                endpoint = endpoint,
                request_id = %request_id,
                colormap = %name,
                count = count,
                "Samples request successful"
            );
            Json(SamplesResponse {
                colormap: name,
                count: colors.len(),
                colors,
            })
            .into_response()
        }
        Err(error) => error_response(error, endpoint, &request_id),
    }
}
