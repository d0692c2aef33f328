//! Configuration file support for Tugboat.
//!
//! Tugboat supports two configuration file locations:
//! - Global: `~/.tugboat/config.toml` - User-wide defaults
//! - Project: `<recipe root>/.tugboat/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Option values given
//! on the command line take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::RawOptions;

/// Name of the configuration file inside a `.tugboat` directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Tugboat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// External tool locations
    pub tools: ToolsConfig,

    /// Default option values, keyed by option name
    pub options: RawOptions,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default number of parallel jobs (None = let the native tool decide)
    pub jobs: Option<usize>,

    /// CMake generator (e.g. "Ninja")
    pub generator: Option<String>,

    /// Ask the native tool for verbose output (None = not set here)
    pub verbose: Option<bool>,
}

/// Tool locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Path to the cmake executable
    pub cmake: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.verbose.is_some() {
            self.build.verbose = other.build.verbose;
        }

        if other.tools.cmake.is_some() {
            self.tools.cmake = other.tools.cmake;
        }

        // Option defaults merge key by key
        self.options.extend(other.options);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.tugboat/config.toml)
/// 2. Global config (~/.tugboat/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global tugboat config directory (~/.tugboat).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".tugboat"))
}

/// Get the project config path (<root>/.tugboat/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".tugboat").join(CONFIG_FILE)
}
