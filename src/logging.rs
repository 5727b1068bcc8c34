//! Logging utilities for gibs-colormaps.
//!
//! Structured `tracing` events for catalog builds, CLI operations and API
//! requests. Logs go to stderr so that command output on stdout stays
//! machine-readable.

use std::time::Instant;
use tracing::{debug, error, info, warn, Level};

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use uuid::Uuid;

use crate::error::GibsError;

/// Tracing layer for API requests: a span per request, latency on response
pub fn create_http_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    DefaultMakeSpan,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::DEBUG)
                .latency_unit(LatencyUnit::Micros),
        )
}

/// Install the global subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Announce the start of a long-running operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    info!(
        operation = operation,
        details = details.unwrap_or("none"),
        "Starting operation"
    );
}

/// Report the end of an operation started at `start_time`.
///
/// `clean` is false when the operation finished but skipped some of its work.
pub fn log_operation_end(operation: &str, start_time: Instant, clean: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if clean {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with skipped items"
        );
    }
}

/// Run `f`, logging its duration under an operation id
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = Uuid::new_v4();
    debug!(operation = operation, operation_id = %operation_id, "Starting operation");

    let result = f();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );
    result
}

/// Log the outcome of loading or building the catalog
pub fn log_catalog_stats(
    source: &str,
    colormap_count: usize,
    document_count: usize,
    from_cache: bool,
) {
    info!(
        operation = "catalog_load",
        source = source,
        colormaps = colormap_count,
        documents = document_count,
        skipped = document_count.saturating_sub(colormap_count),
        from_cache = from_cache,
        "Catalog ready"
    );
}

/// Log an error with context
pub fn log_error(error: &GibsError, context: &str) {
    error!(
        error = %error,
        context = context,
        "Error occurred"
    );
}

/// Log an error that occurred during request processing
pub fn log_request_error(
    error: &GibsError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) {
    // Lookups of unknown names are routine for a read-only catalog
    if matches!(error, GibsError::ColormapNotFound { .. }) {
        warn!(
            error = %error,
            endpoint = endpoint,
            request_id = request_id,
            "Request for unknown colormap"
        );
        return;
    }

    error!(
        error = %error,
        endpoint = endpoint,
        request_id = request_id,
        params = params.unwrap_or("none"),
        "Request processing error"
    );
}

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_generate_request_id() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();

        assert!(!id1.is_empty());
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_log_catalog_stats_with_more_colormaps_than_documents() {
        // Must not underflow
        log_catalog_stats("https://example.test/", 3, 2, true);
    }

    #[test]
    fn test_log_timed_operation() {
        let result = log_timed_operation("test_operation", || {
            std::thread::sleep(Duration::from_millis(1));
            42
        });

        assert_eq!(result, 42);
    }
}
