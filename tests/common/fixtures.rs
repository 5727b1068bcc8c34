//! Catalog fixtures served from memory.
//!
//! The fixture catalog mirrors the shape of the real GIBS listing: an HTML
//! index linking four documents (two continuous, one classification, one
//! with a malformed range) and one unrelated text file.

#![allow(dead_code)]

use gibs_colormaps::{CatalogConfig, Fetch, GibsError};
use reqwest::Url;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Root of the fixture catalog
pub const ROOT_URL: &str = "https://gibs.test/colormaps/v1.3/";

pub const LISTING: &str = include_str!("../fixtures/listing.html");
pub const SST_CONTINUOUS: &str = include_str!("../fixtures/SST_Continuous.xml");
pub const CHLOROPHYLL_BOUNDED: &str = include_str!("../fixtures/Chlorophyll_Bounded.xml");
pub const LAND_COVER_CLASSES: &str = include_str!("../fixtures/Land_Cover_Classes.xml");
pub const BROKEN_RANGE: &str = include_str!("../fixtures/Broken_Range.xml");

/// Names of the documents linked from the listing, in listing order
pub const DOCUMENT_NAMES: [&str; 4] = [
    "Broken_Range",
    "Chlorophyll_Bounded",
    "Land_Cover_Classes",
    "SST_Continuous",
];

/// Names of the documents that yield a colormap
pub const BUILT_NAMES: [&str; 2] = ["Chlorophyll_Bounded", "SST_Continuous"];

/// A fetcher answering from a fixed set of pages and counting requests
#[derive(Clone)]
pub struct MockFetcher {
    pages: Arc<HashMap<String, String>>,
    requests: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// A fetcher serving the given `(url, body)` pages
    pub fn with_pages<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A fetcher serving the fixture catalog
    pub fn catalog() -> Self {
        Self::with_pages([
            (ROOT_URL.to_string(), LISTING),
            (format!("{}SST_Continuous.xml", ROOT_URL), SST_CONTINUOUS),
            (format!("{}Chlorophyll_Bounded.xml", ROOT_URL), CHLOROPHYLL_BOUNDED),
            (format!("{}Land_Cover_Classes.xml", ROOT_URL), LAND_COVER_CLASSES),
            (format!("{}Broken_Range.xml", ROOT_URL), BROKEN_RANGE),
        ])
    }

    /// Number of fetches made so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Fetch for MockFetcher {
    fn fetch_text(&self, url: &Url) -> gibs_colormaps::Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| GibsError::Http {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            })
    }
}

/// Catalog configuration pointing at the fixture root and a cache in `dir`
pub fn catalog_config(dir: &Path) -> CatalogConfig {
    CatalogConfig {
        root_url: ROOT_URL.to_string(),
        cache_path: dir.join("cache").join("gibs_colormaps.json"),
        ..Default::default()
    }
}
