//! Tugboat.toml recipe parsing and schema.
//!
//! The recipe is the declarative description of one native package: its
//! identity, the options it accepts, how those options map onto CMake
//! variables, which files are exported, and what the package exposes to
//! consumers once installed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::errors::Error;
use crate::core::options::{OptionDecl, OptionDecls, OptionDomain, EXAMPLES, SHARED};

/// Canonical recipe file name.
pub const RECIPE_FILE: &str = "Tugboat.toml";

/// Default license file, relative to the recipe root.
pub const DEFAULT_LICENSE_FILE: &str = "LICENSE";

/// Package identity from the [package] section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: Version,
    pub license: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub topics: Vec<String>,
}

/// How resolved options become toolchain variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainMapping {
    /// Variable name -> option name
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Variable name -> literal value; never caller-overridable
    #[serde(default)]
    pub fixed: BTreeMap<String, String>,
}

impl ToolchainMapping {
    /// Default mapping for a package: `<NAME>_BUILD_SHARED` follows the
    /// `shared` option and `<NAME>_BUILD_EXAMPLES` is pinned off.
    pub fn for_package(name: &str) -> Self {
        let prefix = cmake_prefix(name);
        let mut mapping = ToolchainMapping::default();
        mapping
            .variables
            .insert(format!("{}_BUILD_SHARED", prefix), SHARED.to_string());
        mapping
            .fixed
            .insert(examples_variable(name), "OFF".to_string());
        mapping
    }
}

/// Name of the variable that switches a package's example programs.
pub fn examples_variable(name: &str) -> String {
    format!("{}_BUILD_EXAMPLES", cmake_prefix(name))
}

/// Upper-case a package name into a CMake variable prefix.
pub fn cmake_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// What the installed package exposes to downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub cmake_target_name: String,
    pub libs: Vec<String>,
}

impl PackageInfo {
    pub fn for_package(name: &str) -> Self {
        PackageInfo {
            cmake_target_name: format!("{}::{}", name, name),
            libs: vec![name.to_string()],
        }
    }
}

/// A parsed recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Directory containing Tugboat.toml; also the source tree root
    pub root: PathBuf,
    pub package: PackageIdentity,
    pub options: OptionDecls,
    pub toolchain: ToolchainMapping,
    pub package_info: PackageInfo,
    /// License file, relative to `root`
    pub license_file: PathBuf,
    /// Glob patterns, relative to `root`, copied by `export`
    pub exports_sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawRecipe {
    package: RawPackage,

    #[serde(default)]
    options: BTreeMap<String, RawOptionDecl>,

    #[serde(default)]
    toolchain: Option<ToolchainMapping>,

    #[serde(default)]
    package_info: Option<RawPackageInfo>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    version: String,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    license_file: Option<PathBuf>,
    #[serde(default)]
    exports_sources: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawOptionDecl {
    values: toml::Value,
    default: toml::Value,
}

#[derive(Debug, Deserialize)]
struct RawPackageInfo {
    #[serde(default)]
    cmake_target_name: Option<String>,
    #[serde(default)]
    libs: Option<Vec<String>>,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidRecipe {
        message: message.into(),
    }
}

impl Recipe {
    /// Load a recipe from a Tugboat.toml file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe: {}", path.display()))?;

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::parse(&contents, root)
            .with_context(|| format!("failed to load recipe: {}", path.display()))
    }

    /// Parse recipe contents rooted at `root`.
    pub fn parse(contents: &str, root: PathBuf) -> Result<Self> {
        let raw: RawRecipe = toml::from_str(contents).context("failed to parse Tugboat.toml")?;

        let name = raw.package.name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("package name must not be empty").into());
        }

        let version: Version = raw.package.version.parse().map_err(|e| {
            invalid(format!("invalid version `{}`: {}", raw.package.version, e))
        })?;

        let mut options = OptionDecls::builtin();
        for (opt_name, decl) in &raw.options {
            options.declare(option_decl(opt_name, decl)?);
        }

        // The recipe's own table extends the defaults rather than replacing them.
        let mut toolchain = ToolchainMapping::for_package(&name);
        if let Some(own) = raw.toolchain {
            toolchain.variables.extend(own.variables);
            toolchain.fixed.extend(own.fixed);
        }
        for (var, opt_name) in &toolchain.variables {
            if opt_name == EXAMPLES {
                return Err(invalid(format!(
                    "toolchain variable `{}` cannot follow `examples`; pin it under [toolchain.fixed]",
                    var
                ))
                .into());
            }
            if !options.contains(opt_name) {
                return Err(invalid(format!(
                    "toolchain variable `{}` refers to undeclared option `{}`",
                    var, opt_name
                ))
                .into());
            }
        }

        let examples_var = examples_variable(&name);
        if toolchain.variables.contains_key(&examples_var) {
            return Err(invalid(format!(
                "toolchain variable `{}` switches example programs and is always OFF; it cannot follow an option",
                examples_var
            ))
            .into());
        }
        if let Some(value) = toolchain.fixed.get(&examples_var).filter(|v| *v != "OFF") {
            return Err(invalid(format!(
                "toolchain variable `{}` must be pinned to OFF, not `{}`",
                examples_var, value
            ))
            .into());
        }

        let defaults = PackageInfo::for_package(&name);
        let package_info = match raw.package_info {
            Some(info) => PackageInfo {
                cmake_target_name: info.cmake_target_name.unwrap_or(defaults.cmake_target_name),
                libs: info.libs.unwrap_or(defaults.libs),
            },
            None => defaults,
        };
        if package_info.libs.is_empty() {
            return Err(invalid("`package_info.libs` must name at least one library").into());
        }

        let license_file = raw
            .package
            .license_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LICENSE_FILE));

        let exports_sources = raw.package.exports_sources.unwrap_or_else(|| {
            vec![
                "CMakeLists.txt".to_string(),
                "cmake/**/*".to_string(),
                "include/**/*".to_string(),
                "src/**/*".to_string(),
                license_file.display().to_string(),
            ]
        });

        Ok(Recipe {
            root,
            package: PackageIdentity {
                name,
                version,
                license: raw.package.license,
                author: raw.package.author,
                url: raw.package.url,
                description: raw.package.description,
                topics: raw.package.topics,
            },
            options,
            toolchain,
            package_info,
            license_file,
            exports_sources,
        })
    }

    /// Absolute path of the license file in the source tree.
    pub fn license_path(&self) -> PathBuf {
        self.root.join(&self.license_file)
    }
}

fn option_decl(name: &str, raw: &RawOptionDecl) -> Result<OptionDecl, Error> {
    let domain = match &raw.values {
        toml::Value::String(s) if s == "ANY" => OptionDomain::Any,
        toml::Value::Array(values) if !values.is_empty() => {
            if values.iter().all(|v| v.is_bool()) {
                OptionDomain::Bool
            } else if values.iter().all(|v| v.is_str()) {
                OptionDomain::Choice(
                    values
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                )
            } else {
                return Err(invalid(format!(
                    "option `{}` mixes value types; use all booleans or all strings",
                    name
                )));
            }
        }
        _ => {
            return Err(invalid(format!(
                "option `{}` must list its values or use \"ANY\"",
                name
            )))
        }
    };

    let default = domain.accept(&raw.default).ok_or_else(|| {
        invalid(format!(
            "default for option `{}` is not {}",
            name,
            domain.describe()
        ))
    })?;

    Ok(OptionDecl {
        name: name.to_string(),
        domain,
        default,
    })
}
