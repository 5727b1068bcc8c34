//! Common test utilities for gibs-colormaps.
//!
//! This module provides shared utilities for testing the catalog and the API.

// Re-export all common test utilities
pub mod assertions;
pub mod fixtures;
