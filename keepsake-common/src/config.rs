//! Configuration loading and root folder resolution
//!
//! All durable state (database, record container, uploads) lives under a
//! single root folder resolved at startup.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default HTTP port for the keepsake web service
pub const DEFAULT_PORT: u16 = 5750;

/// Environment variable overriding the root folder
pub const ROOT_ENV_VAR: &str = "KEEPSAKE_ROOT";

/// Resolve the root folder, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `KEEPSAKE_ROOT` environment variable
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Get the platform configuration file path (`<config dir>/keepsake/config.toml`)
fn find_config_file() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("keepsake").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("keepsake"))
        .unwrap_or_else(|| PathBuf::from("./keepsake_data"))
}

/// Filesystem layout under the resolved root folder
#[derive(Debug, Clone)]
pub struct RootLayout {
    root: PathBuf,
}

impl RootLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root folder and uploads directory if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.uploads_dir())?;
        info!("Root folder ready: {}", self.root.display());
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the sqlite database holding songs
    pub fn database_path(&self) -> PathBuf {
        self.root.join("keepsake.db")
    }

    /// Path to the local object store container
    pub fn store_path(&self) -> PathBuf {
        self.root.join("records.json")
    }

    /// Directory uploaded files are written to
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }
}
