//! Implementation of `tugboat export`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::layout::{Layout, OUTPUT_DIR};
use crate::core::recipe::Recipe;
use crate::util::fs::{glob_files, relative_path};

/// Copy the recipe's exported sources into `dest`, keeping relative paths.
///
/// Returns the copied paths relative to `dest`, sorted. Files under
/// `.tugboat` or under the layout's output directory are never exported.
pub fn export_sources(recipe: &Recipe, layout: &Layout, dest: &Path) -> Result<Vec<PathBuf>> {
    let skipped = [recipe.root.join(OUTPUT_DIR), layout.output_dir.clone()];
    if dest.starts_with(&recipe.root) && !skipped.iter().any(|dir| dest.starts_with(dir)) {
        bail!(
            "export destination {} is inside the source tree",
            dest.display()
        );
    }

    let files = glob_files(&recipe.root, &recipe.exports_sources)?;
    if files.is_empty() {
        tracing::warn!("no files matched `exports_sources` in {}", recipe.root.display());
    }

    let mut exported = Vec::with_capacity(files.len());
    for file in files {
        if skipped.iter().any(|dir| file.starts_with(dir)) {
            continue;
        }
        let rel = relative_path(&recipe.root, &file);

        let target = dest.join(&rel);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        std::fs::copy(&file, &target)
            .with_context(|| format!("failed to copy {} to {}", file.display(), target.display()))?;
        tracing::debug!("exported {}", rel.display());
        exported.push(rel);
    }

    Ok(exported)
}
