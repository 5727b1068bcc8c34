//! Error types for the gibs-colormaps crate.
//!
//! This module defines a comprehensive error enum covering every failure the
//! catalog build, the colormap builder and the outer surfaces can report.

use thiserror::Error;

/// The main error type for gibs-colormaps operations.
#[derive(Error, Debug)]
pub enum GibsError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network transport errors while talking to the catalog source
    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    /// Malformed XML in a colormap document
    #[error("XML error: {message}")]
    Xml { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A range string such as `[0,1)` could not be parsed
    #[error("Invalid range '{value}': {message}")]
    InvalidRange { value: String, message: String },

    /// An `r,g,b` color attribute could not be parsed
    #[error("Invalid color '{value}': {message}")]
    InvalidColor { value: String, message: String },

    /// A scheme produced no usable range entries
    #[error("Colormap {name} has no usable entries")]
    EmptyScheme { name: String },

    /// Degenerate values during normalization
    #[error("Normalization error: {message}")]
    Normalization { message: String },

    /// Lookup of a colormap that is not in the catalog
    #[error("Colormap not found: {name}")]
    ColormapNotFound { name: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// Conversion into a gradient failed
    #[error("Gradient error: {message}")]
    Gradient { message: String },

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

/// Convenience type alias for Results with GibsError
pub type Result<T> = std::result::Result<T, GibsError>;
