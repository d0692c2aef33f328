//! Tugboat - a package build and install orchestrator for CMake libraries
//!
//! This crate provides the core library functionality for Tugboat:
//! resolving build options, generating toolchain and dependency
//! descriptors, driving the native build tool, and packaging the result.

pub mod builder;
pub mod core;
pub mod generate;
pub mod ops;
pub mod package;
pub mod util;

/// Test utilities and mocks for Tugboat unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a scripted native build tool and recipe fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::Error, layout::Layout, options::OptionSet, recipe::Recipe,
};

pub use util::context::GlobalContext;
