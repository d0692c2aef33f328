//! Implementation of `tugboat build`.

use anyhow::{bail, Context, Result};

use crate::builder::cmake::{is_cmake_project, NativeBuildTool};
use crate::builder::driver::{BuildDriver, Built};
use crate::core::layout::Layout;
use crate::core::recipe::Recipe;
use crate::generate::GeneratedFiles;
use crate::ops::Phase;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Number of parallel jobs
    pub jobs: Option<usize>,

    /// Ask the native tool for verbose output
    pub verbose: bool,
}

/// Configure and build the recipe's source tree against the generated files.
pub fn build(
    recipe: &Recipe,
    layout: &Layout,
    tool: &dyn NativeBuildTool,
    opts: &BuildOptions,
) -> Result<Built> {
    run(recipe, layout, tool, opts).with_context(|| Phase::Build.failed())
}

fn run(
    recipe: &Recipe,
    layout: &Layout,
    tool: &dyn NativeBuildTool,
    opts: &BuildOptions,
) -> Result<Built> {
    if !is_cmake_project(&recipe.root) {
        bail!(
            "no CMakeLists.txt in {}; the recipe root must be a CMake project",
            recipe.root.display()
        );
    }

    let generated = GeneratedFiles::locate(&layout.generators_dir())?;

    let driver = BuildDriver::new(tool)
        .with_jobs(opts.jobs)
        .with_verbose(opts.verbose);

    let configured = driver.configure(&recipe.root, &generated, &layout.build_dir())?;
    let built = driver.build(configured)?;
    Ok(built)
}
