//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The configuration says where definition files are found and supplies
//! render-time fallbacks. Every value has a default, so a missing file is
//! not an error.
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$AOVKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/aovkit/config.toml`
//! 3. `~/.aovkit/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use aovkit::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! let config = result.config;
//!
//! println!("Path list: ${}", config.path_env());
//! println!("Subdirectory: {}", config.subdirectory().display());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::{PathListSearch, AOV_SUBDIRECTORY};

/// Default host path-list environment variable.
pub const DEFAULT_PATH_ENV: &str = "HOUDINI_PATH";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "AOVKIT_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration with defaults applied by its accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values read from the config file
    pub file: FileConfig,
    /// Path the config was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path).map(|config| ConfigLoadResult { config, warnings });
            }
            warnings.push(ConfigWarning {
                message: format!("${} points to a missing file, using defaults", CONFIG_ENV),
                path,
            });
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("aovkit/config.toml");
            if path.exists() {
                return Self::load_from(&path).map(|config| ConfigLoadResult { config, warnings });
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".aovkit/config.toml");
            if path.exists() {
                return Self::load_from(&path).map(|config| ConfigLoadResult { config, warnings });
            }
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Directories scanned before the path list.
    pub fn search_paths(&self) -> &[PathBuf] {
        self.file.search_paths.as_deref().unwrap_or(&[])
    }

    /// Host path-list environment variable.
    ///
    /// Defaults to `HOUDINI_PATH`.
    pub fn path_env(&self) -> &str {
        self.file.path_env.as_deref().unwrap_or(DEFAULT_PATH_ENV)
    }

    /// Subdirectory holding definition files.
    ///
    /// Defaults to `config/aovs`.
    pub fn subdirectory(&self) -> &Path {
        self.file
            .subdirectory
            .as_deref()
            .unwrap_or(Path::new(AOV_SUBDIRECTORY))
    }

    /// Fallback export components. Defaults to none.
    pub fn default_components(&self) -> &[String] {
        self.file.default_components.as_deref().unwrap_or(&[])
    }

    /// Add directories scanned ahead of the configured ones.
    pub fn prepend_search_paths(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        let mut all: Vec<PathBuf> = paths.into_iter().collect();
        all.extend(self.search_paths().iter().cloned());
        self.file.search_paths = Some(all);
    }

    /// The directory search described by this configuration.
    pub fn search(&self) -> PathListSearch {
        PathListSearch::new(self.path_env(), self.subdirectory())
            .with_extra(self.search_paths().to_vec())
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
