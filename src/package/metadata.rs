//! Package metadata published for downstream consumers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::Error;
use crate::core::recipe::PackageInfo;
use crate::package::installer::PackageTree;
use crate::util::fs::write_atomic;

/// Metadata document written into the package tree.
pub const METADATA_FILE: &str = "tugboat-info.json";

/// How consumers reference the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Importable target, e.g. `tinymcp::tinymcp`
    pub cmake_target_name: String,
    /// Library names, in link order
    pub libs: Vec<String>,
}

/// Declare the metadata of an installed package.
pub fn publish(tree: &PackageTree, info: &PackageInfo) -> PackageMetadata {
    tracing::debug!("publishing metadata for {}", tree.root().display());
    PackageMetadata {
        cmake_target_name: info.cmake_target_name.clone(),
        libs: info.libs.clone(),
    }
}

impl PackageMetadata {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write the metadata document into the package tree.
    pub fn attach(&self, tree: &PackageTree) -> Result<PathBuf, Error> {
        let path = tree.root().join(METADATA_FILE);
        let mut json = self.to_json();
        json.push('\n');
        write_atomic(&path, json.as_bytes())?;
        Ok(path)
    }

    /// Read the metadata attached to a package tree, if any.
    pub fn read(package_dir: &Path) -> anyhow::Result<Option<Self>> {
        let path = package_dir.join(METADATA_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = crate::util::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_publish_declares_target_and_libs() {
        let tmp = TempDir::new().unwrap();
        let tree = PackageTree::open(tmp.path()).unwrap();

        let meta = publish(&tree, &PackageInfo::for_package("tinymcp"));
        assert_eq!(meta.cmake_target_name, "tinymcp::tinymcp");
        assert_eq!(meta.libs, vec!["tinymcp"]);
    }

    #[test]
    fn test_attach_and_read() {
        let tmp = TempDir::new().unwrap();
        let tree = PackageTree::open(tmp.path()).unwrap();
        let meta = publish(&tree, &PackageInfo::for_package("demo"));

        let path = meta.attach(&tree).unwrap();
        assert!(path.ends_with(METADATA_FILE));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["cmake_target_name"], "demo::demo");
        assert_eq!(json["libs"], serde_json::json!(["demo"]));

        assert_eq!(PackageMetadata::read(tmp.path()).unwrap(), Some(meta));
    }
}
