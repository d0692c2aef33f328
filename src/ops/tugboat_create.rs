//! Implementation of `tugboat create`: every lifecycle phase in order.

use anyhow::Result;

use crate::builder::cmake::NativeBuildTool;
use crate::core::layout::Layout;
use crate::core::options::RawOptions;
use crate::core::recipe::Recipe;
use crate::generate::GeneratedFiles;
use crate::ops::{build, generate, package, publish_info, BuildOptions, Phase};
use crate::package::{PackageMetadata, PackageTree};

/// Everything a full lifecycle run produced.
#[derive(Debug)]
pub struct CreateResult {
    pub generated: GeneratedFiles,
    pub tree: PackageTree,
    pub metadata: PackageMetadata,
}

/// Run generate, build, package and publish-info in order.
///
/// `on_phase` is called as each phase starts. The first failure stops the
/// run; its error names the phase.
pub fn create(
    recipe: &Recipe,
    raw: &RawOptions,
    layout: &Layout,
    tool: &dyn NativeBuildTool,
    opts: &BuildOptions,
    mut on_phase: impl FnMut(Phase),
) -> Result<CreateResult> {
    on_phase(Phase::Generate);
    let generated = generate(recipe, raw, layout)?;

    on_phase(Phase::Build);
    build(recipe, layout, tool, opts)?;

    on_phase(Phase::Package);
    let tree = package(recipe, layout, tool)?;

    on_phase(Phase::PublishInfo);
    let metadata = publish_info(recipe, layout)?;

    Ok(CreateResult {
        generated,
        tree,
        metadata,
    })
}
