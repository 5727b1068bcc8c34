//! Application state management for gibs-colormaps.
//!
//! This module defines the shared state that is passed to all handlers,
//! containing the loaded catalog.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::colormaps::SegmentedColormap;
use crate::config::Config;
use crate::error::Result;

/// The main application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Loaded colormaps
    pub catalog: Catalog,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config, catalog: Catalog) -> Arc<Self> {
        Arc::new(Self::new(config, catalog))
    }

    /// Get a colormap
    pub fn get_colormap(&self, name: &str) -> Option<&SegmentedColormap> {
        self.catalog.get(name)
    }

    /// Get a colormap with error handling
    pub fn get_colormap_checked(&self, name: &str) -> Result<&SegmentedColormap> {
        self.catalog.get_checked(name)
    }

    /// Number of colormaps being served
    pub fn colormap_count(&self) -> usize {
        self.catalog.len()
    }
}
