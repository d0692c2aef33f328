//! Global context for Tugboat operations.
//!
//! Provides the working directory, recipe discovery and the configuration
//! file locations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::recipe::RECIPE_FILE;
use crate::util::config::{self, Config};

/// Where Tugboat was invoked and where its global configuration lives.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Tugboat data (~/.tugboat/)
    home: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext {
            cwd,
            home: config::global_config_dir(),
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a specific home directory instead of `~/.tugboat`.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join(config::CONFIG_FILE))
    }

    /// Resolve a directory argument against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Find the recipe file (Tugboat.toml) starting from `start` and searching upward.
    pub fn find_recipe_from(&self, start: &Path) -> Option<PathBuf> {
        let mut current = self.resolve_path(start);
        loop {
            let candidate = current.join(RECIPE_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Find the recipe file starting from the working directory.
    pub fn find_recipe(&self) -> Option<PathBuf> {
        self.find_recipe_from(&self.cwd)
    }

    /// Load the merged global and project configuration for a recipe root.
    pub fn load_config(&self, recipe_root: &Path) -> Config {
        let global = self.config_path();
        config::load_config(
            global.as_deref(),
            &config::project_config_path(recipe_root),
        )
    }
}
