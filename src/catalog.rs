//! The colormap catalog and its assembly.
//!
//! A catalog maps document names (without the `.xml` suffix) to built
//! colormaps. It is assembled once from the remote listing, persisted as a
//! JSON snapshot and loaded from that snapshot on later runs.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::colormaps::{build_colormap, SegmentedColormap};
use crate::config::CatalogConfig;
use crate::document::parse_document;
use crate::error::{GibsError, Result};
use crate::harvester::harvest_listing;
use crate::logging::{log_catalog_stats, log_operation_end, log_operation_start};

/// Snapshot layout version; snapshots written with another version are rebuilt
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Source of catalog documents
pub trait Fetch {
    /// Fetch the body of `url` as text
    fn fetch_text(&self, url: &Url) -> Result<String>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GibsError::Http {
                url: String::new(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &Url) -> Result<String> {
        let http_error = |e: reqwest::Error| GibsError::Http {
            url: url.to_string(),
            message: e.to_string(),
        };
        debug!(url = %url, "Fetching");
        self.client
            .get(url.clone())
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(http_error)
    }
}

/// A read-only mapping from colormap name to colormap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    colormaps: BTreeMap<String, SegmentedColormap>,
}

impl Catalog {
    /// Build a catalog from build results, dropping absent entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<SegmentedColormap>)>,
    {
        Self {
            colormaps: entries
                .into_iter()
                .filter_map(|(name, colormap)| colormap.map(|c| (name, c)))
                .collect(),
        }
    }

    /// Look up a colormap by name
    pub fn get(&self, name: &str) -> Option<&SegmentedColormap> {
        self.colormaps.get(name)
    }

    /// Look up a colormap by name with error handling
    pub fn get_checked(&self, name: &str) -> Result<&SegmentedColormap> {
        self.get(name).ok_or_else(|| GibsError::ColormapNotFound {
            name: name.to_string(),
        })
    }

    /// Colormap names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colormaps.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentedColormap)> {
        self.colormaps.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.colormaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colormaps.is_empty()
    }
}

/// The persisted form of a full catalog build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub format_version: u32,
    /// Catalog root the snapshot was built from
    pub source: String,
    pub created_at: DateTime<Utc>,
    /// Every harvested document; `None` where no colormap was built
    pub colormaps: BTreeMap<String, Option<SegmentedColormap>>,
}

impl CacheSnapshot {
    /// Read a snapshot; `Ok(None)` when the file does not exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }

    /// Write the snapshot, creating parent directories as needed
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_vec(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The catalog this snapshot describes
    pub fn catalog(&self) -> Catalog {
        Catalog::from_entries(self.colormaps.clone())
    }
}

/// Assembles a catalog from the remote listing or the cache snapshot
pub struct CatalogAssembler<F: Fetch> {
    config: CatalogConfig,
    fetcher: F,
}

impl CatalogAssembler<HttpFetcher> {
    /// Create an assembler fetching over HTTP
    pub fn over_http(config: CatalogConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(config, fetcher))
    }
}

impl<F: Fetch> CatalogAssembler<F> {
    pub fn new(config: CatalogConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Load the catalog from a valid snapshot, or build and persist it
    pub fn load(&self) -> Result<Catalog> {
        if !self.config.refresh {
            if let Some(snapshot) = self.load_snapshot() {
                let catalog = snapshot.catalog();
                log_catalog_stats(&snapshot.source, catalog.len(), snapshot.colormaps.len(), true);
                return Ok(catalog);
            }
        }

        let snapshot = self.build_snapshot()?;
        snapshot.write(&self.config.cache_path)?;
        info!(path = %self.config.cache_path.display(), "Wrote catalog snapshot");

        let catalog = snapshot.catalog();
        log_catalog_stats(&snapshot.source, catalog.len(), snapshot.colormaps.len(), false);
        Ok(catalog)
    }

    /// Read the snapshot, treating unreadable, foreign or outdated ones as absent
    fn load_snapshot(&self) -> Option<CacheSnapshot> {
        let path = &self.config.cache_path;
        let snapshot = match CacheSnapshot::read(path) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(path = %path.display(), "No catalog snapshot");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable catalog snapshot, rebuilding");
                return None;
            }
        };

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            warn!(
                path = %path.display(),
                found = snapshot.format_version,
                expected = SNAPSHOT_FORMAT_VERSION,
                "Catalog snapshot has another format version, rebuilding"
            );
            return None;
        }
        if snapshot.source != self.config.root_url {
            warn!(
                path = %path.display(),
                found = %snapshot.source,
                expected = %self.config.root_url,
                "Catalog snapshot was built from another source, rebuilding"
            );
            return None;
        }

        info!(
            path = %path.display(),
            created_at = %snapshot.created_at,
            "Loaded catalog snapshot"
        );
        Some(snapshot)
    }

    /// Harvest, fetch and build every document of the catalog root
    pub fn build_snapshot(&self) -> Result<CacheSnapshot> {
        let start = Instant::now();
        log_operation_start("catalog_build", Some(&self.config.root_url));

        let root = Url::parse(&self.config.root_url).map_err(|e| GibsError::Config {
            message: format!("Invalid catalog root URL {}: {}", self.config.root_url, e),
        })?;
        let listing = self.fetcher.fetch_text(&root)?;
        let links = harvest_listing(&listing, &self.config.suffix);
        info!(documents = links.len(), "Colormap documents to build");

        let mut colormaps = BTreeMap::new();
        for link in &links {
            let url = root.join(link).map_err(|e| GibsError::Config {
                message: format!("Invalid document link {}: {}", link, e),
            })?;
            let name = document_name(link, &self.config.suffix);

            let xml = self.fetcher.fetch_text(&url)?;
            let colormap = match parse_document(&xml) {
                Ok(document) => build_colormap(&name, &document),
                Err(e) => {
                    warn!(colormap = %name, error = %e, "Failed to read colormap document");
                    None
                }
            };
            colormaps.insert(name, colormap);
        }

        let built = colormaps.values().filter(|c| c.is_some()).count();
        log_operation_end("catalog_build", start, built == colormaps.len());

        Ok(CacheSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            source: self.config.root_url.clone(),
            created_at: Utc::now(),
            colormaps,
        })
    }
}

/// Catalog key for a document link: its last path segment without the suffix
pub fn document_name(link: &str, suffix: &str) -> String {
    let file = link.rsplit('/').next().unwrap_or(link);
    file.strip_suffix(suffix).unwrap_or(file).to_string()
}

static CATALOG: OnceCell<Catalog> = OnceCell::new();

/// Initialize the process-wide catalog once and return it.
///
/// Later calls return the catalog from the first successful call, whatever
/// configuration they pass. Fetching blocks, so call this outside of an
/// async runtime (or from `spawn_blocking`).
pub fn init_catalog(config: &CatalogConfig) -> Result<&'static Catalog> {
    CATALOG.get_or_try_init(|| CatalogAssembler::over_http(config.clone())?.load())
}

/// The process-wide catalog, initialized with the default configuration on
/// first use
pub fn catalog() -> Result<&'static Catalog> {
    init_catalog(&CatalogConfig::default())
}
