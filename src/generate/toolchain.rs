//! Toolchain descriptor rendering.
//!
//! The descriptor is a pure function of the recipe's variable mapping and the
//! resolved option set. It is written twice: as a CMake toolchain file the
//! native build consumes, and as a JSON mirror the later phases read back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::Error;
use crate::core::options::{OptionSet, OptionValue};
use crate::core::recipe::ToolchainMapping;
use crate::util::fs::write_atomic;

/// CMake toolchain file name in the generators directory.
pub const TOOLCHAIN_FILE: &str = "tugboat_toolchain.cmake";

/// JSON mirror of the toolchain descriptor.
pub const TOOLCHAIN_JSON: &str = "tugboat_toolchain.json";

/// Variable carrying the build configuration.
pub const BUILD_TYPE_VAR: &str = "CMAKE_BUILD_TYPE";

/// Variable carrying the default library kind.
pub const SHARED_LIBS_VAR: &str = "BUILD_SHARED_LIBS";

/// Ordered variable set handed to the native build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainDescriptor {
    variables: BTreeMap<String, String>,
}

/// Paths of a written toolchain descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainFiles {
    pub cmake: PathBuf,
    pub json: PathBuf,
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Render the descriptor for one option set.
pub fn render(mapping: &ToolchainMapping, options: &OptionSet) -> ToolchainDescriptor {
    let mut variables = BTreeMap::new();

    variables.insert(
        BUILD_TYPE_VAR.to_string(),
        options.build_type().as_str().to_string(),
    );
    variables.insert(
        SHARED_LIBS_VAR.to_string(),
        on_off(options.shared()).to_string(),
    );

    for (var, option) in &mapping.variables {
        let value = match options.get(option) {
            Some(OptionValue::Bool(b)) => on_off(*b).to_string(),
            Some(OptionValue::Str(s)) => s.clone(),
            None => {
                tracing::warn!("toolchain variable `{}` bound to unset option `{}`", var, option);
                continue;
            }
        };
        variables.insert(var.clone(), value);
    }

    // Fixed values win over anything the caller asked for.
    for (var, value) in &mapping.fixed {
        variables.insert(var.clone(), value.clone());
    }

    if options.examples() {
        tracing::warn!("example programs are never built for packages; ignoring `examples=true`");
    }

    ToolchainDescriptor { variables }
}

impl ToolchainDescriptor {
    pub fn get(&self, var: &str) -> Option<&str> {
        self.variables.get(var).map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Build configuration recorded in the descriptor.
    pub fn build_type(&self) -> &str {
        self.get(BUILD_TYPE_VAR).unwrap_or("Release")
    }

    /// Render the CMake toolchain file.
    ///
    /// Contains no absolute paths, so identical descriptors give identical
    /// bytes wherever they are written.
    pub fn to_cmake(&self) -> String {
        let mut out = String::new();
        out.push_str("# Generated by tugboat. Do not edit.\n\n");
        out.push_str("list(PREPEND CMAKE_PREFIX_PATH \"${CMAKE_CURRENT_LIST_DIR}\")\n");
        out.push_str("list(PREPEND CMAKE_MODULE_PATH \"${CMAKE_CURRENT_LIST_DIR}\")\n\n");

        for (var, value) in &self.variables {
            out.push_str(&format!(
                "set({} \"{}\" CACHE STRING \"Defined by tugboat toolchain\" FORCE)\n",
                var,
                cmake_escape(value)
            ));
        }

        out
    }

    /// Render the JSON mirror.
    pub fn to_json(&self) -> String {
        // BTreeMap of strings always serializes.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write both files into `generators_dir`, replacing earlier ones.
    pub fn write(&self, generators_dir: &Path) -> Result<ToolchainFiles, Error> {
        let files = ToolchainFiles {
            cmake: generators_dir.join(TOOLCHAIN_FILE),
            json: generators_dir.join(TOOLCHAIN_JSON),
        };

        write_atomic(&files.cmake, self.to_cmake().as_bytes())?;
        write_atomic(&files.json, self.to_json().as_bytes())?;

        tracing::debug!("wrote toolchain to {}", files.cmake.display());
        Ok(files)
    }

    /// Read the JSON mirror back from `generators_dir`.
    pub fn load(generators_dir: &Path) -> anyhow::Result<Self> {
        let path = generators_dir.join(TOOLCHAIN_JSON);
        if !path.is_file() || !generators_dir.join(TOOLCHAIN_FILE).is_file() {
            return Err(Error::MissingGeneratedFile { path }.into());
        }

        let contents = crate::util::fs::read_to_string(&path)?;
        let descriptor = serde_json::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("corrupt toolchain descriptor {}: {}", path.display(), e)
        })?;
        Ok(descriptor)
    }
}

/// Quote a value for a CMake string argument.
pub fn cmake_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
