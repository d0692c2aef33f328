//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod create;
pub mod export;
pub mod generate;
pub mod inspect;
pub mod package;
pub mod publish_info;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};

use crate::cli::{GlobalArgs, RecipeArgs};
use tugboat::builder::CMakeTool;
use tugboat::core::options::RawOptions;
use tugboat::core::recipe::{Recipe, RECIPE_FILE};
use tugboat::core::Layout;
use tugboat::ops::BuildOptions;
use tugboat::util::diagnostic::suggestions;
use tugboat::util::fs::relative_path;
use tugboat::util::{Config, GlobalContext};

/// Everything a command needs about the recipe it works on.
pub struct Session {
    pub ctx: GlobalContext,
    pub recipe: Recipe,
    pub layout: Layout,
    pub config: Config,
}

impl Session {
    /// Locate and load the recipe, then the merged configuration for it.
    pub fn open(args: &RecipeArgs) -> Result<Self> {
        let ctx = GlobalContext::new()?;

        let recipe_path = match &args.recipe_dir {
            Some(dir) => {
                let path = ctx.resolve_path(dir).join(RECIPE_FILE);
                if !path.is_file() {
                    bail!("no {} in {}", RECIPE_FILE, dir.display());
                }
                path
            }
            None => ctx.find_recipe().ok_or_else(|| {
                anyhow!(
                    "could not find {} in {} or any parent directory\n{}",
                    RECIPE_FILE,
                    ctx.cwd().display(),
                    suggestions::NO_RECIPE
                )
            })?,
        };

        let recipe = Recipe::load(&recipe_path)?;
        tracing::debug!("loaded recipe {}", recipe_path.display());

        let layout = match &args.output_dir {
            Some(dir) => Layout::new(ctx.resolve_path(dir)),
            None => Layout::for_root(&recipe.root),
        };
        let config = ctx.load_config(&recipe.root);

        Ok(Session {
            ctx,
            recipe,
            layout,
            config,
        })
    }

    /// `name vX.Y.Z` for status lines.
    pub fn label(&self) -> String {
        format!("{} v{}", self.recipe.package.name, self.recipe.package.version)
    }

    /// Raw option input: config defaults overridden by command-line values.
    pub fn raw_options(&self, cli: &[(String, toml::Value)]) -> RawOptions {
        let mut raw = self.config.options.clone();
        raw.extend(cli.iter().cloned());
        raw
    }

    /// The native build tool: `--cmake` > `[tools] cmake` > PATH.
    pub fn tool(&self, global: &GlobalArgs) -> Result<CMakeTool> {
        let tool = match global.cmake.as_deref().or(self.config.tools.cmake.as_deref()) {
            Some(program) => CMakeTool::new(program),
            None => CMakeTool::discover()?,
        };
        Ok(tool.with_generator(self.config.build.generator.clone()))
    }

    /// Jobs: CLI > config > None (native tool default).
    pub fn build_options(&self, jobs: Option<usize>, global: &GlobalArgs) -> BuildOptions {
        BuildOptions {
            jobs: jobs.or(self.config.build.jobs),
            verbose: global.verbose || self.config.build.verbose.unwrap_or(false),
        }
    }

    /// A path as shown to the user, relative to the working directory.
    pub fn display_path(&self, path: &Path) -> PathBuf {
        let rel = relative_path(self.ctx.cwd(), path);
        if rel.starts_with("..") {
            path.to_path_buf()
        } else {
            rel
        }
    }
}
