//! Configuration management for gibs-colormaps.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GibsError, Result};

/// Command-line arguments for gibs-colormaps
#[derive(Parser, Debug)]
#[command(name = "gibs-colormaps")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Catalog root serving the colormap directory listing
    #[arg(long, global = true, env = "GIBS_ROOT_URL")]
    pub root_url: Option<String>,

    /// Path of the catalog snapshot
    #[arg(long, global = true, env = "GIBS_CACHE")]
    pub cache: Option<PathBuf>,

    /// Ignore an existing snapshot and rebuild the catalog
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Path to JSON configuration file
    #[arg(short, long, global = true, env = "GIBS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "GIBS_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the catalog
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load or build the catalog and report its size
    Build,
    /// List the colormap names
    List,
    /// Print one colormap as JSON
    Show {
        /// Colormap name
        name: String,
        /// Print this many evenly spaced RGBA colors instead of the curve
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Render one colormap as a PNG colorbar
    Render {
        /// Colormap name
        name: String,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
        /// Image width in pixels
        #[arg(long, default_value = "512")]
        width: u32,
        /// Image height in pixels
        #[arg(long, default_value = "32")]
        height: u32,
        /// Draw the under/over colors at the ends
        #[arg(long)]
        extend: bool,
    },
    /// Serve the catalog over HTTP
    Serve {
        /// Host address to bind to
        #[arg(short = 'H', long, env = "GIBS_HOST")]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "GIBS_PORT")]
        port: Option<u16>,
    },
}

/// Catalog source and cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog root serving the directory listing
    #[serde(default = "default_root_url")]
    pub root_url: String,

    /// Path of the JSON catalog snapshot
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Suffix of colormap documents in the listing
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rebuild even when a valid snapshot exists
    #[serde(default)]
    pub refresh: bool,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Resolve configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(root_url) = args.root_url {
            config.catalog.root_url = root_url;
        }
        if let Some(cache) = args.cache {
            config.catalog.cache_path = cache;
        }
        if args.refresh {
            config.catalog.refresh = true;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Command::Serve { host, port } = &args.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.catalog = other.catalog;
        self.server = other.server;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate the catalog root (must be an absolute http(s) URL)
        match reqwest::Url::parse(&self.catalog.root_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(GibsError::Config {
                    message: format!("Unsupported catalog URL scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(GibsError::Config {
                    message: format!("Invalid catalog URL {}: {}", self.catalog.root_url, e),
                });
            }
        }

        if self.catalog.suffix.is_empty() {
            return Err(GibsError::Config {
                message: "Document suffix cannot be empty".to_string(),
            });
        }

        if self.catalog.cache_path.as_os_str().is_empty() {
            return Err(GibsError::Config {
                message: "Cache path cannot be empty".to_string(),
            });
        }

        if self.catalog.timeout_secs == 0 {
            return Err(GibsError::Config {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        // Validate server host
        if self.server.host.is_empty() {
            return Err(GibsError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(GibsError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(GibsError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            cache_path: default_cache_path(),
            suffix: default_suffix(),
            timeout_secs: default_timeout_secs(),
            refresh: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Default value functions for serde
fn default_root_url() -> String {
    "https://gibs.earthdata.nasa.gov/colormaps/v1.3/".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("gibs_colormaps.json")
}

fn default_suffix() -> String {
    ".xml".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}
