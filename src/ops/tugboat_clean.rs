//! Implementation of `tugboat clean`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::layout::Layout;
use crate::util::fs::remove_dir_all_if_exists;

/// Remove generated files, the build tree and the package tree.
///
/// Anything else in the output directory (such as a project config file)
/// is kept. Returns the directories that existed and were removed.
pub fn clean(layout: &Layout) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in layout.owned_dirs() {
        if dir.exists() {
            remove_dir_all_if_exists(&dir)?;
            removed.push(dir);
        }
    }
    Ok(removed)
}
