//! Test utilities for Tugboat unit tests.
//!
//! Provides a scripted native build tool that records the steps it is asked
//! to run, plus helpers producing generated files and recipe source trees.
//!
//! # Example
//!
//! ```rust,ignore
//! use tugboat::test_support::{FakeTool, ProjectFixture};
//!
//! let tool = FakeTool::new().fail_on(ToolStep::Build, ToolOutput::failure(2, "ld: error"));
//! let project = ProjectFixture::library("demo").write_to(tmp.path());
//! ```

pub mod fixtures;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::builder::cmake::{
    BuildRequest, ConfigureRequest, InstallRequest, NativeBuildTool, ToolOutput,
};
use crate::core::errors::{Error, ToolStep};
use crate::core::options::{resolve, OptionDecls, RawOptions};
use crate::core::recipe::ToolchainMapping;
use crate::generate::{toolchain, DependencyDescriptor, GeneratedFiles};

pub use fixtures::*;

/// Scripted native build tool.
///
/// Every step succeeds unless told otherwise. A successful install writes a
/// header and a static library under the prefix, like a real install would.
#[derive(Debug, Default)]
pub struct FakeTool {
    library: String,
    failures: HashMap<ToolStep, ToolOutput>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeTool {
    /// Create a tool that installs a library named `demo`.
    pub fn new() -> Self {
        Self::installing("demo")
    }

    /// Create a tool that installs `lib<name>.a` and `<name>.h`.
    pub fn installing(name: impl Into<String>) -> Self {
        FakeTool {
            library: name.into(),
            failures: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make `step` return `output` instead of succeeding.
    pub fn fail_on(mut self, step: ToolStep, output: ToolOutput) -> Self {
        self.failures.insert(step, output);
        self
    }

    /// Steps run so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn step(&self, step: ToolStep, name: &'static str) -> ToolOutput {
        self.calls.borrow_mut().push(name);
        self.failures
            .get(&step)
            .cloned()
            .unwrap_or_else(ToolOutput::success)
    }
}

impl NativeBuildTool for FakeTool {
    fn name(&self) -> &str {
        "fake-cmake"
    }

    fn configure(&self, _req: &ConfigureRequest<'_>) -> Result<ToolOutput, Error> {
        Ok(self.step(ToolStep::Configure, "configure"))
    }

    fn build(&self, _req: &BuildRequest<'_>) -> Result<ToolOutput, Error> {
        Ok(self.step(ToolStep::Build, "build"))
    }

    fn install(&self, req: &InstallRequest<'_>) -> Result<ToolOutput, Error> {
        let output = self.step(ToolStep::Install, "install");
        if output.is_success() {
            let include = req.prefix.join("include");
            let lib = req.prefix.join("lib");
            std::fs::create_dir_all(&include).map_err(|e| Error::write_failure(&include, e))?;
            std::fs::create_dir_all(&lib).map_err(|e| Error::write_failure(&lib, e))?;

            let header = include.join(format!("{}.h", self.library));
            std::fs::write(&header, "#pragma once\n").map_err(|e| Error::write_failure(&header, e))?;
            let archive = lib.join(format!("lib{}.a", self.library));
            std::fs::write(&archive, "!<arch>\n").map_err(|e| Error::write_failure(&archive, e))?;
        }
        Ok(output)
    }
}

/// Generate toolchain files for package `demo` under `<dir>/generators`.
pub fn generated_files(dir: &Path, shared: bool) -> GeneratedFiles {
    let mut raw = RawOptions::new();
    raw.insert("shared".to_string(), toml::Value::Boolean(shared));
    let options = resolve(&OptionDecls::builtin(), &raw).unwrap();

    let generators_dir = dir.join("generators");
    let descriptor = toolchain::render(&ToolchainMapping::for_package("demo"), &options);
    let files = descriptor.write(&generators_dir).unwrap();

    GeneratedFiles::new(
        &generators_dir,
        descriptor,
        files,
        &DependencyDescriptor::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fake_tool_install_writes_files() {
        let tmp = TempDir::new().unwrap();
        let tool = FakeTool::installing("tinymcp");

        let out = tool
            .install(&InstallRequest {
                build_dir: tmp.path(),
                build_type: "Release",
                prefix: &tmp.path().join("pkg"),
            })
            .unwrap();

        assert!(out.is_success());
        assert!(tmp.path().join("pkg/lib/libtinymcp.a").is_file());
        assert!(tmp.path().join("pkg/include/tinymcp.h").is_file());
        assert_eq!(tool.calls(), vec!["install"]);
    }
}
