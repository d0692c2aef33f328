//! Per-invocation output directories.

use std::path::{Path, PathBuf};

/// Default output directory name under the recipe root.
pub const OUTPUT_DIR: &str = ".tugboat";

/// The directories one invocation owns.
///
/// Two invocations must not share an output directory; nothing here locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub output_dir: PathBuf,
}

impl Layout {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Layout {
            output_dir: output_dir.into(),
        }
    }

    /// Default layout for a recipe rooted at `root`.
    pub fn for_root(root: &Path) -> Self {
        Layout::new(root.join(OUTPUT_DIR))
    }

    /// Generated toolchain and dependency files.
    pub fn generators_dir(&self) -> PathBuf {
        self.output_dir.join("generators")
    }

    /// Native build tree.
    pub fn build_dir(&self) -> PathBuf {
        self.output_dir.join("build")
    }

    /// Installed package tree.
    pub fn package_dir(&self) -> PathBuf {
        self.output_dir.join("package")
    }

    /// Directories removed by `clean`.
    pub fn owned_dirs(&self) -> [PathBuf; 3] {
        [self.generators_dir(), self.build_dir(), self.package_dir()]
    }
}
