//! Core data structures for Tugboat.
//!
//! - The recipe (Tugboat.toml) and its option declarations
//! - Resolved option sets
//! - Resolved dependency references
//! - Output layout and the error taxonomy

pub mod dependency;
pub mod errors;
pub mod layout;
pub mod options;
pub mod recipe;

pub use dependency::{DependencyGraph, ResolvedDependency, LOCK_FILE};
pub use errors::{DriverState, Error, ToolStep};
pub use layout::Layout;
pub use options::{resolve, BuildType, OptionDecls, OptionSet, OptionValue, RawOptions};
pub use recipe::{PackageInfo, Recipe, ToolchainMapping, RECIPE_FILE};
