//! Dependency descriptor rendering.
//!
//! Serializes an already-resolved dependency graph into CMake package
//! config files so `find_package(<name>)` in the consumed project finds
//! each dependency in the generators directory.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::core::dependency::{DependencyGraph, ResolvedDependency};
use crate::core::errors::Error;
use crate::core::recipe::cmake_prefix;
use crate::generate::toolchain::cmake_escape;
use crate::util::fs::write_atomic;

/// Ordered, deduplicated set of resolved dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDescriptor {
    entries: Vec<ResolvedDependency>,
}

/// One generated file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub contents: String,
}

fn invalid(message: String) -> Error {
    Error::InvalidLock { message }
}

/// A dependency name becomes a file name stem, so it must be one plain path
/// component.
fn check_name(name: &str) -> Result<(), Error> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\', '\0']) {
        return Err(invalid(format!(
            "dependency name `{}` is not a plain file name",
            name
        )));
    }
    Ok(())
}

/// Render the descriptor for a resolved graph.
///
/// Fails when a name cannot be used as a file name, or when two names differ
/// only by case and would share generated files.
pub fn render(graph: &DependencyGraph) -> Result<DependencyDescriptor, Error> {
    let mut entries = graph.packages.clone();
    for dep in &entries {
        check_name(&dep.name)?;
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let before = entries.len();
    entries.dedup_by(|a, b| a.name == b.name);
    if entries.len() != before {
        tracing::warn!("lock file lists some dependencies more than once; keeping the first");
    }

    let mut stems: BTreeMap<String, &str> = BTreeMap::new();
    for dep in &entries {
        if let Some(other) = stems.insert(dep.name.to_lowercase(), &dep.name) {
            return Err(invalid(format!(
                "dependencies `{}` and `{}` differ only by case",
                other, dep.name
            )));
        }
    }

    Ok(DependencyDescriptor { entries })
}

impl DependencyDescriptor {
    pub fn entries(&self) -> &[ResolvedDependency] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every file, in a stable order.
    pub fn files(&self) -> Vec<GeneratedFile> {
        let mut files = Vec::with_capacity(self.entries.len() * 2);
        for dep in &self.entries {
            let stem = dep.name.to_lowercase();
            files.push(GeneratedFile {
                file_name: format!("{}-config.cmake", stem),
                contents: config_file(dep),
            });
            files.push(GeneratedFile {
                file_name: format!("{}-config-version.cmake", stem),
                contents: version_file(dep),
            });
        }
        files
    }

    /// Write every file into `generators_dir`.
    pub fn write(&self, generators_dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::new();
        for file in self.files() {
            let path = generators_dir.join(&file.file_name);
            write_atomic(&path, file.contents.as_bytes())?;
            written.push(path);
        }

        tracing::debug!(
            "wrote {} dependency files to {}",
            written.len(),
            generators_dir.display()
        );
        Ok(written)
    }
}

fn cmake_path(path: &Path) -> String {
    cmake_escape(&path.to_string_lossy().replace('\\', "/"))
}

fn config_file(dep: &ResolvedDependency) -> String {
    let target = dep.target_name();
    let prefix = cmake_prefix(&dep.name);
    let root = cmake_path(&dep.location);

    let include_dirs: Vec<String> = dep
        .include_dirs
        .iter()
        .map(|d| cmake_path(&dep.location.join(d)))
        .collect();
    let lib_dirs: Vec<String> = dep
        .lib_dirs
        .iter()
        .map(|d| format!("\"{}\"", cmake_path(&dep.location.join(d))))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "# Generated by tugboat for {} {}. Do not edit.\n\n",
        dep.name, dep.version
    ));
    out.push_str(&format!("set({}_FOUND TRUE)\n", dep.name));
    out.push_str(&format!("set({}_VERSION \"{}\")\n", dep.name, dep.version));
    out.push_str(&format!("set({}_PACKAGE_FOLDER \"{}\")\n\n", dep.name, root));

    out.push_str(&format!("if(NOT TARGET {})\n", target));
    out.push_str(&format!("  add_library({} INTERFACE IMPORTED)\n", target));
    if !include_dirs.is_empty() {
        out.push_str(&format!(
            "  set_property(TARGET {} PROPERTY INTERFACE_INCLUDE_DIRECTORIES \"{}\")\n",
            target,
            include_dirs.join(";")
        ));
    }

    for lib in &dep.libs {
        let var = format!("{}_{}_LIBRARY", prefix, cmake_prefix(lib));
        out.push_str(&format!(
            "  find_library({} NAMES {} PATHS {} NO_DEFAULT_PATH)\n",
            var,
            lib,
            lib_dirs.join(" ")
        ));
        out.push_str(&format!("  if(NOT {})\n", var));
        out.push_str(&format!(
            "    message(FATAL_ERROR \"{}: library '{}' not found under {}\")\n",
            dep.name, lib, root
        ));
        out.push_str("  endif()\n");
        out.push_str(&format!(
            "  set_property(TARGET {} APPEND PROPERTY INTERFACE_LINK_LIBRARIES \"${{{}}}\")\n",
            target, var
        ));
    }
    out.push_str("endif()\n");

    out
}

fn version_file(dep: &ResolvedDependency) -> String {
    let v = &dep.version;
    format!(
        "# Generated by tugboat for {name} {version}. Do not edit.\n\
         \n\
         set(PACKAGE_VERSION \"{major}.{minor}.{patch}\")\n\
         \n\
         if(PACKAGE_VERSION VERSION_LESS PACKAGE_FIND_VERSION)\n\
         \x20 set(PACKAGE_VERSION_COMPATIBLE FALSE)\n\
         else()\n\
         \x20 if(PACKAGE_FIND_VERSION_MAJOR STREQUAL \"{major}\")\n\
         \x20   set(PACKAGE_VERSION_COMPATIBLE TRUE)\n\
         \x20 else()\n\
         \x20   set(PACKAGE_VERSION_COMPATIBLE FALSE)\n\
         \x20 endif()\n\
         \x20 if(PACKAGE_FIND_VERSION STREQUAL PACKAGE_VERSION)\n\
         \x20   set(PACKAGE_VERSION_EXACT TRUE)\n\
         \x20 endif()\n\
         endif()\n",
        name = dep.name,
        version = v,
        major = v.major,
        minor = v.minor,
        patch = v.patch,
    )
}
