//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tugboat::core::options::parse_assignment;

/// Tugboat - build, install and package CMake libraries from a recipe
#[derive(Parser)]
#[command(name = "tugboat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the cmake executable
    #[arg(long, global = true, env = "TUGBOAT_CMAKE", value_name = "PATH")]
    pub cmake: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve options and write the toolchain and dependency descriptors
    Generate(GenerateArgs),

    /// Configure and build against the generated toolchain
    Build(BuildArgs),

    /// Install the built tree and stage the license
    #[command(alias = "install")]
    Package(PackageArgs),

    /// Write and print the package's consumer metadata
    PublishInfo(PublishInfoArgs),

    /// Run generate, build, package and publish-info in order
    Create(CreateArgs),

    /// Copy the recipe's exported sources to a directory
    Export(ExportArgs),

    /// Show what the recipe declares
    Inspect(InspectArgs),

    /// Remove generated files, build and package trees
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Clone, Default)]
pub struct RecipeArgs {
    /// Directory containing Tugboat.toml (defaults to searching upward from cwd)
    #[arg(long, value_name = "DIR")]
    pub recipe_dir: Option<PathBuf>,

    /// Output directory (defaults to <recipe dir>/.tugboat)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
pub struct OptionArgs {
    /// Set a build option (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub options: Vec<(String, toml::Value)>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,
}

#[derive(Args)]
pub struct PublishInfoArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    #[command(flatten)]
    pub options: OptionArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Destination directory
    pub dest: PathBuf,

    #[command(flatten)]
    pub recipe: RecipeArgs,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
