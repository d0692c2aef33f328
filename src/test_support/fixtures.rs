//! Test fixtures for common test scenarios.
//!
//! A [`ProjectFixture`] is a recipe source tree: Tugboat.toml, a CMake
//! project, a license and sources, ready to be written to a temp dir.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::recipe::{Recipe, RECIPE_FILE};

/// Fixture for a recipe source tree.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Package name.
    pub name: String,
    /// Tugboat.toml content.
    pub recipe: String,
    /// Files (path relative to project root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    /// A minimal CMake library package with a license.
    pub fn library(name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = crate::core::recipe::cmake_prefix(&name);

        let recipe = format!(
            r#"[package]
name = "{name}"
version = "0.1.0"
license = "MIT"
description = "Test package {name}"

[options]
shared = {{ values = [true, false], default = false }}

[toolchain.variables]
{prefix}_BUILD_SHARED = "shared"

[toolchain.fixed]
{prefix}_BUILD_EXAMPLES = "OFF"

[package_info]
cmake_target_name = "{name}::{name}"
libs = ["{name}"]
"#
        );

        let mut files = BTreeMap::new();
        files.insert(
            PathBuf::from("CMakeLists.txt"),
            format!(
                "cmake_minimum_required(VERSION 3.16)\nproject({name} C)\nadd_library({name} src/{name}.c)\ninstall(TARGETS {name})\n"
            ),
        );
        files.insert(
            PathBuf::from(format!("src/{}.c", name)),
            "int answer(void) { return 42; }\n".to_string(),
        );
        files.insert(
            PathBuf::from(format!("include/{}.h", name)),
            "int answer(void);\n".to_string(),
        );
        files.insert(
            PathBuf::from("LICENSE"),
            "MIT License\n\nCopyright (c) Test Contributors\n".to_string(),
        );
        files.insert(PathBuf::from("Readme.md"), format!("# {}\n", name));

        ProjectFixture {
            name,
            recipe,
            files,
        }
    }

    /// Drop a file from the fixture.
    pub fn without(mut self, path: impl AsRef<Path>) -> Self {
        self.files.remove(path.as_ref());
        self
    }

    /// Write the tree under `dir` and return the loaded recipe.
    pub fn write_to(&self, dir: &Path) -> Recipe {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(RECIPE_FILE), &self.recipe).unwrap();

        for (path, content) in &self.files {
            let full = dir.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, content).unwrap();
        }

        Recipe::load(&dir.join(RECIPE_FILE)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_library_fixture_loads() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("tinymcp").write_to(tmp.path());

        assert_eq!(recipe.package.name, "tinymcp");
        assert!(recipe.license_path().is_file());
        assert!(recipe
            .toolchain
            .fixed
            .contains_key("TINYMCP_BUILD_EXAMPLES"));
    }
}
