//! # gibs-colormaps
//!
//! NASA GIBS colormaps mirrored into a cached, ready-to-use catalog.
//!
//! GIBS publishes its colormaps as small XML documents behind a directory
//! listing. This library harvests the listing, reads every document, turns
//! each continuous scheme into a piecewise-linear colormap over 0.0..=1.0 and
//! keeps the result in a JSON snapshot so later runs skip the network.
//!
//! ## Architecture
//!
//! - **Harvesting**: anchor targets ending in `.xml` are collected from the listing
//! - **Building**: range entries are parsed, normalized and turned into channel curves
//! - **Catalog**: built colormaps keyed by document name, cached on disk
//! - **Surfaces**: a CLI and a read-only HTTP API over the catalog
//!
//! ```no_run
//! use gibs_colormaps::colormaps::Colormap;
//!
//! let catalog = gibs_colormaps::catalog()?;
//! if let Some(cmap) = catalog.get("MODIS_Chlorophyll_A") {
//!     let rgba = cmap.map_normalized(0.25);
//!     println!("{:?}", rgba);
//! }
//! # Ok::<(), gibs_colormaps::GibsError>(())
//! ```

pub mod catalog;
pub mod colormaps;
pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod harvester;
pub mod logging;
pub mod state;

pub use catalog::{catalog, init_catalog, CacheSnapshot, Catalog, CatalogAssembler, Fetch, HttpFetcher};
pub use colormaps::{build_colormap, SegmentedColormap};
pub use config::{CatalogConfig, Config};
pub use error::{GibsError, Result};
pub use logging::{
    create_http_trace_layer, generate_request_id, init_tracing, log_catalog_stats, log_error,
    log_operation_end, log_operation_start, log_request_error, log_timed_operation,
};
pub use state::AppState;
