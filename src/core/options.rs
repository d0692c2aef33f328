//! Build options: declarations, values and resolution.
//!
//! The set of option keys is closed: it is fixed by the built-in options plus
//! whatever the recipe declares. Resolution fills every key, taking the
//! caller's value when it is inside the declared domain and the default
//! otherwise.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::Error;

/// Name of the link-mode option.
pub const SHARED: &str = "shared";

/// Name of the example-program inclusion option.
pub const EXAMPLES: &str = "examples";

/// Name of the build configuration option.
pub const BUILD_TYPE: &str = "build_type";

/// Caller-supplied option values, possibly partial.
pub type RawOptions = BTreeMap<String, toml::Value>;

/// A resolved option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            OptionValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// The values an option may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionDomain {
    /// Boolean-like: true/false, on/off, yes/no, 1/0
    Bool,
    /// One of a fixed list of strings
    Choice(Vec<String>),
    /// Any scalar, kept as a string
    Any,
}

impl OptionDomain {
    /// Human description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            OptionDomain::Bool => "a boolean: true/false, on/off, yes/no, 1/0".to_string(),
            OptionDomain::Choice(values) => format!("one of {}", values.join(", ")),
            OptionDomain::Any => "any scalar value".to_string(),
        }
    }

    /// Check a raw value against the domain, normalizing it.
    pub fn accept(&self, raw: &toml::Value) -> Option<OptionValue> {
        match self {
            OptionDomain::Bool => parse_bool(raw).map(OptionValue::Bool),
            OptionDomain::Choice(values) => {
                let text = scalar_text(raw)?;
                if let Some(v) = values.iter().find(|v| **v == text) {
                    return Some(OptionValue::Str(v.clone()));
                }
                // Case-insensitive fallback, only when unambiguous.
                let mut matches = values.iter().filter(|v| v.eq_ignore_ascii_case(&text));
                match (matches.next(), matches.next()) {
                    (Some(v), None) => Some(OptionValue::Str(v.clone())),
                    _ => None,
                }
            }
            OptionDomain::Any => scalar_text(raw).map(OptionValue::Str),
        }
    }
}

fn parse_bool(raw: &toml::Value) -> Option<bool> {
    match raw {
        toml::Value::Boolean(b) => Some(*b),
        toml::Value::Integer(0) => Some(false),
        toml::Value::Integer(1) => Some(true),
        toml::Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(true),
            "false" | "off" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn scalar_text(raw: &toml::Value) -> Option<String> {
    match raw {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn render_raw(raw: &toml::Value) -> String {
    match raw {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: String,
    pub domain: OptionDomain,
    pub default: OptionValue,
}

impl OptionDecl {
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        OptionDecl {
            name: name.into(),
            domain: OptionDomain::Bool,
            default: OptionValue::Bool(default),
        }
    }

    pub fn choice(name: impl Into<String>, values: &[&str], default: &str) -> Self {
        OptionDecl {
            name: name.into(),
            domain: OptionDomain::Choice(values.iter().map(|v| v.to_string()).collect()),
            default: OptionValue::Str(default.to_string()),
        }
    }

    /// Validate a caller value for this option.
    pub fn check(&self, raw: &toml::Value) -> Result<OptionValue, Error> {
        self.domain
            .accept(raw)
            .ok_or_else(|| Error::InvalidOptionValue {
                option: self.name.clone(),
                value: render_raw(raw),
                expected: self.domain.describe(),
            })
    }
}

/// CMake build configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub const ALL: [&'static str; 4] = ["Debug", "Release", "RelWithDebInfo", "MinSizeRel"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(format!(
                "invalid build type '{}'; expected one of {}",
                s,
                BuildType::ALL.join(", ")
            )),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of options a recipe accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecls {
    decls: BTreeMap<String, OptionDecl>,
}

impl OptionDecls {
    /// Built-in options every package has.
    pub fn builtin() -> Self {
        let mut decls = OptionDecls {
            decls: BTreeMap::new(),
        };
        decls.declare(OptionDecl::boolean(SHARED, false));
        decls.declare(OptionDecl::boolean(EXAMPLES, false));
        decls.declare(OptionDecl::choice(
            BUILD_TYPE,
            &BuildType::ALL,
            BuildType::default().as_str(),
        ));
        decls
    }

    /// Add or replace a declaration.
    pub fn declare(&mut self, decl: OptionDecl) {
        self.decls.insert(decl.name.clone(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&OptionDecl> {
        self.decls.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.decls.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.decls.values()
    }
}

impl Default for OptionDecls {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Fully-defaulted options for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(OptionValue::as_bool)
    }

    pub fn shared(&self) -> bool {
        self.get_bool(SHARED).unwrap_or(false)
    }

    pub fn examples(&self) -> bool {
        self.get_bool(EXAMPLES).unwrap_or(false)
    }

    pub fn build_type(&self) -> BuildType {
        self.get(BUILD_TYPE)
            .and_then(OptionValue::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }
}

/// Resolve caller input against the declarations.
///
/// Unknown keys are rejected rather than ignored so typos surface.
pub fn resolve(decls: &OptionDecls, raw: &RawOptions) -> Result<OptionSet, Error> {
    if let Some(unknown) = raw.keys().find(|k| !decls.contains(k)) {
        return Err(Error::UnknownOption {
            option: unknown.clone(),
            known: decls.names(),
        });
    }

    let mut values = BTreeMap::new();
    for decl in decls.iter() {
        let value = match raw.get(&decl.name) {
            Some(v) => decl.check(v)?,
            None => decl.default.clone(),
        };
        values.insert(decl.name.clone(), value);
    }

    tracing::debug!("resolved {} options", values.len());
    Ok(OptionSet { values })
}

/// Parse a `key=value` command-line assignment.
pub fn parse_assignment(s: &str) -> Result<(String, toml::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid option '{}'; expected KEY=VALUE", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid option '{}'; empty option name", s));
    }
    Ok((key.to_string(), toml::Value::String(value.trim().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, toml::Value)]) -> RawOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_resolve_all_defaults() {
        let set = resolve(&OptionDecls::builtin(), &RawOptions::new()).unwrap();

        assert!(!set.shared());
        assert!(!set.examples());
        assert_eq!(set.build_type(), BuildType::Release);
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn test_resolve_bool_spellings() {
        let decls = OptionDecls::builtin();
        for (input, expected) in [
            (toml::Value::Boolean(true), true),
            (toml::Value::String("True".into()), true),
            (toml::Value::String("ON".into()), true),
            (toml::Value::String("off".into()), false),
            (toml::Value::String("no".into()), false),
            (toml::Value::Integer(1), true),
        ] {
            let set = resolve(&decls, &raw(&[(SHARED, input)])).unwrap();
            assert_eq!(set.shared(), expected);
        }
    }

    #[test]
    fn test_resolve_rejects_out_of_domain() {
        let err = resolve(
            &OptionDecls::builtin(),
            &raw(&[(SHARED, toml::Value::String("maybe".into()))]),
        )
        .unwrap_err();

        match err {
            Error::InvalidOptionValue { option, value, .. } => {
                assert_eq!(option, "shared");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_key() {
        let err = resolve(
            &OptionDecls::builtin(),
            &raw(&[("shraed", toml::Value::Boolean(true))]),
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnknownOption { ref option, .. } if option == "shraed"));
    }

    #[test]
    fn test_choice_is_case_insensitive_but_canonical() {
        let set = resolve(
            &OptionDecls::builtin(),
            &raw(&[(BUILD_TYPE, toml::Value::String("debug".into()))]),
        )
        .unwrap();

        assert_eq!(set.get(BUILD_TYPE), Some(&OptionValue::Str("Debug".into())));
        assert_eq!(set.build_type(), BuildType::Debug);
    }

    #[test]
    fn test_recipe_can_override_builtin_default() {
        let mut decls = OptionDecls::builtin();
        decls.declare(OptionDecl::boolean(SHARED, true));

        let set = resolve(&decls, &RawOptions::new()).unwrap();
        assert!(set.shared());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("shared=True").unwrap(),
            ("shared".to_string(), toml::Value::String("True".into()))
        );
        assert!(parse_assignment("shared").is_err());
        assert!(parse_assignment("=on").is_err());
    }
}
