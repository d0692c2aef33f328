//! Resolved dependency references.
//!
//! Tugboat never resolves dependencies itself. An external resolver writes
//! `Tugboat.lock` next to the recipe; this module only reads it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Lock file produced by the dependency resolver.
pub const LOCK_FILE: &str = "Tugboat.lock";

/// A dependency already resolved to a concrete version and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub name: String,
    pub version: Version,
    /// Root of the dependency's installed package tree
    pub location: PathBuf,

    /// Imported target name (defaults to `name::name`)
    #[serde(default)]
    pub target: Option<String>,

    /// Libraries to link, by base name
    #[serde(default)]
    pub libs: Vec<String>,

    /// Include directories, relative to `location`
    #[serde(default = "default_include_dirs")]
    pub include_dirs: Vec<PathBuf>,

    /// Library directories, relative to `location`
    #[serde(default = "default_lib_dirs")]
    pub lib_dirs: Vec<PathBuf>,
}

fn default_include_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("include")]
}

fn default_lib_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("lib")]
}

impl ResolvedDependency {
    pub fn new(name: impl Into<String>, version: Version, location: impl Into<PathBuf>) -> Self {
        ResolvedDependency {
            name: name.into(),
            version,
            location: location.into(),
            target: None,
            libs: Vec::new(),
            include_dirs: default_include_dirs(),
            lib_dirs: default_lib_dirs(),
        }
    }

    pub fn with_libs(mut self, libs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.libs = libs.into_iter().map(Into::into).collect();
        self
    }

    /// Name of the imported CMake target.
    pub fn target_name(&self) -> String {
        self.target
            .clone()
            .unwrap_or_else(|| format!("{}::{}", self.name, self.name))
    }
}

/// The resolved dependency set for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    #[serde(default, rename = "package")]
    pub packages: Vec<ResolvedDependency>,
}

impl DependencyGraph {
    pub fn new(packages: Vec<ResolvedDependency>) -> Self {
        DependencyGraph { packages }
    }

    /// Load a lock file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lock file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse lock file: {}", path.display()))
    }

    /// Load the lock file if present; a missing file is an empty graph.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("no lock file at {}, assuming no dependencies", path.display());
            Ok(Self::default())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_lock_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCK_FILE);
        std::fs::write(
            &path,
            r#"
[[package]]
name = "nlohmann_json"
version = "3.11.2"
location = "/opt/deps/nlohmann_json"

[[package]]
name = "zlib"
version = "1.3.1"
location = "/opt/deps/zlib"
target = "ZLIB::ZLIB"
libs = ["z"]
"#,
        )
        .unwrap();

        let graph = DependencyGraph::load(&path).unwrap();
        assert_eq!(graph.packages.len(), 2);

        let json = &graph.packages[0];
        assert_eq!(json.target_name(), "nlohmann_json::nlohmann_json");
        assert_eq!(json.include_dirs, vec![PathBuf::from("include")]);
        assert!(json.libs.is_empty());

        let zlib = &graph.packages[1];
        assert_eq!(zlib.target_name(), "ZLIB::ZLIB");
        assert_eq!(zlib.version, Version::new(1, 3, 1));
    }

    #[test]
    fn test_missing_lock_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let graph = DependencyGraph::load_or_default(&tmp.path().join(LOCK_FILE)).unwrap();
        assert!(graph.is_empty());
    }
}
