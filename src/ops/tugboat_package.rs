//! Implementation of `tugboat package` and `tugboat publish-info`.

use anyhow::{anyhow, Context, Result};

use crate::builder::cmake::NativeBuildTool;
use crate::builder::driver::Built;
use crate::core::layout::Layout;
use crate::core::recipe::Recipe;
use crate::generate::GeneratedFiles;
use crate::ops::Phase;
use crate::package::{install, publish, stage_auxiliary, AuxiliaryFile, PackageMetadata, PackageTree};

/// Install a previously built tree and stage the license next to it.
///
/// The build directory must hold a successful build made from the
/// toolchain and dependency files currently in the generators directory.
pub fn package(recipe: &Recipe, layout: &Layout, tool: &dyn NativeBuildTool) -> Result<PackageTree> {
    run_package(recipe, layout, tool).with_context(|| Phase::Package.failed())
}

fn run_package(recipe: &Recipe, layout: &Layout, tool: &dyn NativeBuildTool) -> Result<PackageTree> {
    let generated = GeneratedFiles::locate(&layout.generators_dir())?;
    let built = Built::resume(&layout.build_dir(), &generated)?;

    let tree = install(tool, built, &layout.package_dir())?;
    stage_auxiliary(&[AuxiliaryFile::license(recipe)], &tree)?;
    Ok(tree)
}

/// Declare the package's consumer metadata and attach it to the package tree.
pub fn publish_info(recipe: &Recipe, layout: &Layout) -> Result<PackageMetadata> {
    run_publish_info(recipe, layout).with_context(|| Phase::PublishInfo.failed())
}

fn run_publish_info(recipe: &Recipe, layout: &Layout) -> Result<PackageMetadata> {
    let package_dir = layout.package_dir();
    let tree = PackageTree::open(&package_dir).ok_or_else(|| {
        anyhow!(
            "no package tree at {}; run `tugboat package` first",
            package_dir.display()
        )
    })?;

    let metadata = publish(&tree, &recipe.package_info);
    metadata.attach(&tree)?;
    Ok(metadata)
}
