//! Generators: toolchain and dependency descriptors.
//!
//! Both generators are independent pure renderers followed by a write into
//! the invocation's generators directory. The build driver consumes what
//! they wrote through [`GeneratedFiles`] and nothing else.

pub mod deps;
pub mod toolchain;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::hash::Fingerprint;

pub use deps::DependencyDescriptor;
pub use toolchain::{ToolchainDescriptor, ToolchainFiles, TOOLCHAIN_FILE};

/// The generated inputs of one build.
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub generators_dir: PathBuf,
    pub toolchain_file: PathBuf,
    pub toolchain: ToolchainDescriptor,
    pub dependency_files: Vec<PathBuf>,
    fingerprint: String,
}

fn is_dependency_file(name: &str) -> bool {
    name.ends_with("-config.cmake") || name.ends_with("-config-version.cmake")
}

/// Digest over the toolchain and every dependency file, by file name.
fn fingerprint_of(toolchain: &ToolchainDescriptor, mut deps: Vec<(String, String)>) -> String {
    deps.sort();
    deps.into_iter()
        .fold(
            Fingerprint::new().with_str(&toolchain.to_cmake()),
            |fp, (name, contents)| fp.with_str(&name).with_str(&contents),
        )
        .finish()
}

impl GeneratedFiles {
    /// Describe what was just written into `generators_dir`.
    pub fn new(
        generators_dir: &Path,
        toolchain: ToolchainDescriptor,
        files: ToolchainFiles,
        dependencies: &DependencyDescriptor,
    ) -> Self {
        let rendered: Vec<(String, String)> = dependencies
            .files()
            .into_iter()
            .map(|f| (f.file_name, f.contents))
            .collect();
        let dependency_files = rendered
            .iter()
            .map(|(name, _)| generators_dir.join(name))
            .collect();

        GeneratedFiles {
            generators_dir: generators_dir.to_path_buf(),
            toolchain_file: files.cmake,
            fingerprint: fingerprint_of(&toolchain, rendered),
            toolchain,
            dependency_files,
        }
    }

    /// Pick up what a previous `generate` left in `generators_dir`.
    pub fn locate(generators_dir: &Path) -> Result<Self> {
        let toolchain = ToolchainDescriptor::load(generators_dir)?;

        let mut dependency_files = Vec::new();
        let mut contents = Vec::new();
        for entry in std::fs::read_dir(generators_dir)
            .with_context(|| format!("failed to read directory: {}", generators_dir.display()))?
        {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if is_dependency_file(&name) {
                contents.push((name, crate::util::fs::read_to_string(&path)?));
                dependency_files.push(path);
            }
        }
        dependency_files.sort();

        Ok(GeneratedFiles {
            generators_dir: generators_dir.to_path_buf(),
            toolchain_file: generators_dir.join(TOOLCHAIN_FILE),
            fingerprint: fingerprint_of(&toolchain, contents),
            toolchain,
            dependency_files,
        })
    }

    /// Fingerprint of the toolchain and dependency descriptors together.
    ///
    /// A build recorded under a different fingerprint is stale.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
