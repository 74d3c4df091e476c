//! Configuration management for the dxray service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings
//! except the archive root.

use crate::core::error::{DxrayError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Index path value selecting an ephemeral in-memory index
pub const IN_MEMORY_INDEX: &str = ":memory:";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Archive layout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    /// Directory holding the volume directories
    #[serde(default)]
    pub root: PathBuf,

    /// Volume directory name prefix
    #[serde(default = "default_volume_prefix")]
    pub volume_prefix: String,

    /// Descriptor file name inside each study directory
    #[serde(default = "default_descriptor_name")]
    pub descriptor_name: String,

    /// Archive-root prefix used by object paths inside descriptors
    #[serde(default = "default_object_prefix")]
    pub object_prefix: String,
}

/// Search index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Index directory, or `:memory:` for an ephemeral index
    #[serde(default = "default_index_path")]
    pub path: PathBuf,

    /// Seconds between periodic rescans (0 disables them)
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,

    /// Log progress every N studies
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,

    /// Only log progress once the scan has run this long
    #[serde(default = "default_progress_after")]
    pub progress_after_secs: u64,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum keys returned per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Page size used by `list` when no limit is given
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix of the study API
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

// Default value functions
fn default_volume_prefix() -> String {
    "VOL".to_string()
}

fn default_descriptor_name() -> String {
    "study.xml".to_string()
}

fn default_object_prefix() -> String {
    "/DICOMPACS/ORCONSOLEDB/".to_string()
}

fn default_index_path() -> PathBuf {
    PathBuf::from("./index")
}

fn default_scan_interval() -> u64 {
    120
}

fn default_progress_every() -> usize {
    100
}

fn default_progress_after() -> u64 {
    5
}

fn default_max_results() -> usize {
    100
}

fn default_list_limit() -> usize {
    100
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api/dxray/v1".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            volume_prefix: default_volume_prefix(),
            descriptor_name: default_descriptor_name(),
            object_prefix: default_object_prefix(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            scan_interval_secs: default_scan_interval(),
            progress_every: default_progress_every(),
            progress_after_secs: default_progress_after(),
        }
    }
}

impl IndexConfig {
    /// Whether the index lives in memory only
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_INDEX
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            default_list_limit: default_list_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
        }
    }
}

impl ServerConfig {
    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DxrayError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Configuration for an archive root with everything else defaulted
    pub fn for_archive(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.archive.root = root.into();
        config
    }

    /// Load and validate config with priority: env vars > TOML > defaults
    ///
    /// Priority order:
    /// 1. DXRAY_CONFIG env var
    /// 2. XDG config file (~/.config/dxray/config.toml)
    /// 3. ./dxray.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let config = Self::resolve(xdg)?;
        config.validate()?;
        Ok(config)
    }

    /// Same sources as `load_with_xdg`, without validation, so callers
    /// can apply their own overrides first
    pub fn resolve(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DXRAY_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("dxray.toml").exists() {
                Self::from_file("dxray.toml")?
            } else {
                Self::default()
            }
        };

        // Index goes to the XDG data directory unless set explicitly
        if env::var("DXRAY_INDEX_PATH").is_err() && config.index.path == default_index_path() {
            config.index.path = xdg.index_dir();
        }

        config.merge_env();
        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Archive configuration
        if let Ok(root) = env::var("DXRAY_ARCHIVE_ROOT") {
            self.archive.root = PathBuf::from(root);
        }

        // Index configuration
        if let Ok(path) = env::var("DXRAY_INDEX_PATH") {
            self.index.path = PathBuf::from(path);
        }
        if let Ok(interval) = env::var("DXRAY_SCAN_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.index.scan_interval_secs = secs;
            }
        }

        // Search configuration
        if let Ok(max_results) = env::var("DXRAY_MAX_RESULTS") {
            if let Ok(max) = max_results.parse() {
                self.search.max_results = max;
            }
        }

        // Server configuration
        if let Ok(host) = env::var("DXRAY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("DXRAY_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.archive.root.as_os_str().is_empty() {
            return Err(DxrayError::ConfigError(
                "Archive root must be set (archive.root or DXRAY_ARCHIVE_ROOT)".to_string(),
            ));
        }

        if self.archive.volume_prefix.is_empty() {
            return Err(DxrayError::ConfigError(
                "Volume prefix must be non-empty".to_string(),
            ));
        }

        if self.search.max_results == 0 {
            return Err(DxrayError::ConfigError(
                "Max results must be non-zero".to_string(),
            ));
        }

        if self.index.progress_every == 0 {
            return Err(DxrayError::ConfigError(
                "Progress interval must be non-zero".to_string(),
            ));
        }

        if !self.server.api_prefix.starts_with('/') {
            return Err(DxrayError::ConfigError(format!(
                "API prefix must start with '/': {}",
                self.server.api_prefix
            )));
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Archive root: {:?}", self.archive.root);
        tracing::info!("  Volume prefix: {}", self.archive.volume_prefix);
        tracing::info!("  Descriptor: {}", self.archive.descriptor_name);
        tracing::info!("  Object prefix: {}", self.archive.object_prefix);
        tracing::info!("  Index path: {:?}", self.index.path);
        tracing::info!("  Scan interval: {}s", self.index.scan_interval_secs);
        tracing::info!("  Max results: {}", self.search.max_results);
        tracing::info!("  Listen: {}", self.server.bind_addr());
        tracing::info!("  API prefix: {}", self.server.api_prefix);
    }
}
