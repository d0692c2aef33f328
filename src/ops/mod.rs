//! High-level operations.
//!
//! This module contains the implementation of Tugboat commands. Every
//! operation takes its inputs explicitly and wraps failures with the name of
//! the phase that failed; the underlying [`crate::core::Error`] stays
//! reachable through `anyhow::Error::downcast_ref` or the error chain.

use std::fmt;

pub mod tugboat_build;
pub mod tugboat_clean;
pub mod tugboat_create;
pub mod tugboat_export;
pub mod tugboat_generate;
pub mod tugboat_inspect;
pub mod tugboat_package;

pub use tugboat_build::{build, BuildOptions};
pub use tugboat_clean::clean;
pub use tugboat_create::{create, CreateResult};
pub use tugboat_export::export_sources;
pub use tugboat_generate::generate;
pub use tugboat_inspect::{inspect, OptionSummary, RecipeSummary};
pub use tugboat_package::{package, publish_info};

/// The lifecycle phases, in the order `create` runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generate,
    Build,
    Package,
    PublishInfo,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Generate,
        Phase::Build,
        Phase::Package,
        Phase::PublishInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Generate => "generate",
            Phase::Build => "build",
            Phase::Package => "package",
            Phase::PublishInfo => "publish-info",
        }
    }

    /// Context attached to errors raised while the phase runs.
    pub(crate) fn failed(&self) -> String {
        format!("`{}` phase failed", self.as_str())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
