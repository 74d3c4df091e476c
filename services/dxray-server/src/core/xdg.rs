//! XDG Base Directory Support
//!
//! Resolves where dxray looks for its configuration file and where
//! it keeps the persistent search index on Linux/Unix systems.

use std::env;
use std::fs;
use std::path::PathBuf;

/// XDG directory structure for dxray
///
/// Explicit `DXRAY_*` variables win over the `XDG_*` variables,
/// which win over the XDG defaults below the home directory.
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve("DXRAY_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: Self::resolve("DXRAY_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    fn resolve(explicit: &str, xdg_var: &str, default: &[&str]) -> PathBuf {
        if let Ok(dir) = env::var(explicit) {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var(xdg_var) {
            return PathBuf::from(xdg).join("dxray");
        }

        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        for segment in default {
            path.push(segment);
        }
        path.join("dxray")
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        // DXRAY_CONFIG is an explicit override
        if let Ok(file) = env::var("DXRAY_CONFIG") {
            return PathBuf::from(file);
        }

        self.config_dir.join("config.toml")
    }

    /// Default location of the persistent study index
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Create the XDG directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
