//! Implementation of `tugboat inspect`.

use serde::Serialize;

use crate::core::options::{OptionDomain, OptionValue};
use crate::core::recipe::{PackageIdentity, PackageInfo, Recipe, ToolchainMapping};

/// Declared option, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSummary {
    pub name: String,
    /// Accepted values, `["ANY"]` for free-form options
    pub values: Vec<String>,
    pub default: OptionValue,
}

/// What a recipe declares, without building anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    #[serde(flatten)]
    pub package: PackageIdentity,
    pub options: Vec<OptionSummary>,
    pub toolchain: ToolchainMapping,
    pub package_info: PackageInfo,
    pub exports_sources: Vec<String>,
}

pub fn inspect(recipe: &Recipe) -> RecipeSummary {
    let options = recipe
        .options
        .iter()
        .map(|decl| OptionSummary {
            name: decl.name.clone(),
            values: match &decl.domain {
                OptionDomain::Bool => vec!["true".to_string(), "false".to_string()],
                OptionDomain::Choice(values) => values.clone(),
                OptionDomain::Any => vec!["ANY".to_string()],
            },
            default: decl.default.clone(),
        })
        .collect();

    RecipeSummary {
        package: recipe.package.clone(),
        options,
        toolchain: recipe.toolchain.clone(),
        package_info: recipe.package_info.clone(),
        exports_sources: recipe.exports_sources.clone(),
    }
}

impl RecipeSummary {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const RECIPE: &str = r#"
[package]
name = "tinymcp"
version = "0.2.0"
license = "MIT"
topics = ["mcp"]

[options]
log = { values = ["off", "info"], default = "off" }
"#;

    #[test]
    fn test_inspect_lists_options() {
        let recipe = Recipe::parse(RECIPE, PathBuf::from("/src/tinymcp")).unwrap();
        let summary = inspect(&recipe);

        assert_eq!(summary.package.name, "tinymcp");
        let names: Vec<_> = summary.options.iter().map(|o| o.name.as_str()).collect();
        assert!(names.contains(&"shared"));
        assert!(names.contains(&"log"));

        let log = summary.options.iter().find(|o| o.name == "log").unwrap();
        assert_eq!(log.values, vec!["off", "info"]);
        assert_eq!(log.default, OptionValue::Str("off".to_string()));
    }

    #[test]
    fn test_inspect_json() {
        let recipe = Recipe::parse(RECIPE, PathBuf::from("/src/tinymcp")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&inspect(&recipe).to_json()).unwrap();

        assert_eq!(json["name"], "tinymcp");
        assert_eq!(json["version"], "0.2.0");
        assert_eq!(json["package_info"]["cmake_target_name"], "tinymcp::tinymcp");
        assert_eq!(json["toolchain"]["fixed"]["TINYMCP_BUILD_EXAMPLES"], "OFF");
    }
}
