//! Packaging: install, auxiliary staging and metadata publication.

pub mod installer;
pub mod metadata;

pub use installer::{install, stage_auxiliary, AuxiliaryFile, PackageTree, LICENSES_DIR};
pub use metadata::{publish, PackageMetadata, METADATA_FILE};
