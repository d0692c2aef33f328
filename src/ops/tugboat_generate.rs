//! Implementation of `tugboat generate`.

use anyhow::{Context, Result};

use crate::core::dependency::{DependencyGraph, LOCK_FILE};
use crate::core::layout::Layout;
use crate::core::options::{resolve, RawOptions};
use crate::core::recipe::Recipe;
use crate::generate::{deps, toolchain, GeneratedFiles};
use crate::ops::Phase;
use crate::util::fs::remove_dir_all_if_exists;

/// Resolve options and write the toolchain and dependency descriptors.
///
/// Options are validated before anything touches the disk, so an invalid
/// value leaves the generators directory as it was. A valid run replaces
/// the directory whole.
pub fn generate(recipe: &Recipe, raw: &RawOptions, layout: &Layout) -> Result<GeneratedFiles> {
    run(recipe, raw, layout).with_context(|| Phase::Generate.failed())
}

fn run(recipe: &Recipe, raw: &RawOptions, layout: &Layout) -> Result<GeneratedFiles> {
    let options = resolve(&recipe.options, raw)?;
    for (name, value) in options.iter() {
        tracing::debug!("option {} = {}", name, value);
    }

    let graph = DependencyGraph::load_or_default(&recipe.root.join(LOCK_FILE))?;

    let descriptor = toolchain::render(&recipe.toolchain, &options);
    let dependencies = deps::render(&graph)?;

    let generators_dir = layout.generators_dir();
    remove_dir_all_if_exists(&generators_dir)?;

    let files = descriptor.write(&generators_dir)?;
    dependencies.write(&generators_dir)?;
    tracing::info!(
        "wrote {} with {} dependency descriptor(s)",
        files.cmake.display(),
        dependencies.entries().len()
    );

    Ok(GeneratedFiles::new(
        &generators_dir,
        descriptor,
        files,
        &dependencies,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;
    use crate::test_support::ProjectFixture;
    use tempfile::TempDir;

    fn raw(pairs: &[(&str, toml::Value)]) -> RawOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_generate_writes_toolchain() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("tinymcp").write_to(tmp.path());
        let layout = Layout::for_root(tmp.path());

        let generated = generate(
            &recipe,
            &raw(&[("shared", toml::Value::Boolean(true))]),
            &layout,
        )
        .unwrap();

        assert!(generated.toolchain_file.is_file());
        assert_eq!(generated.toolchain.get("TINYMCP_BUILD_SHARED"), Some("ON"));
        assert_eq!(generated.toolchain.get("TINYMCP_BUILD_EXAMPLES"), Some("OFF"));
        assert!(generated.dependency_files.is_empty());
    }

    #[test]
    fn test_invalid_option_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("tinymcp").write_to(tmp.path());
        let layout = Layout::for_root(tmp.path());

        let err = generate(
            &recipe,
            &raw(&[("shared", toml::Value::String("maybe".into()))]),
            &layout,
        )
        .unwrap_err();

        assert!(err.to_string().contains("`generate` phase failed"));
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidOptionValue { .. })
        ));
        assert!(!layout.generators_dir().exists());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("tinymcp").write_to(tmp.path());

        let err = generate(
            &recipe,
            &raw(&[("with_ssl", toml::Value::Boolean(true))]),
            &Layout::for_root(tmp.path()),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_generate_reads_lock_file() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("app").write_to(tmp.path());
        std::fs::write(
            tmp.path().join(LOCK_FILE),
            r#"
[[package]]
name = "zlib"
version = "1.3.1"
location = "/opt/deps/zlib"
libs = ["z"]
"#,
        )
        .unwrap();

        let generated = generate(&recipe, &RawOptions::new(), &Layout::for_root(tmp.path())).unwrap();

        let names: Vec<_> = generated
            .dependency_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["zlib-config.cmake", "zlib-config-version.cmake"]);
    }

    #[test]
    fn test_lock_name_cannot_escape_generators_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        let recipe = ProjectFixture::library("app").write_to(&root);
        std::fs::write(
            root.join(LOCK_FILE),
            r#"
[[package]]
name = "../../../escaped"
version = "1.0.0"
location = "/opt/deps/escaped"
"#,
        )
        .unwrap();
        let layout = Layout::for_root(&root);

        let err = generate(&recipe, &RawOptions::new(), &layout).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidLock { .. })
        ));
        assert!(!tmp.path().join("escaped-config.cmake").exists());
        assert!(!layout.generators_dir().exists());
    }

    #[test]
    fn test_unremovable_generators_dir_is_write_failure() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("tinymcp").write_to(tmp.path());
        let layout = Layout::for_root(tmp.path());
        std::fs::create_dir_all(&layout.output_dir).unwrap();
        std::fs::write(layout.generators_dir(), "not a directory").unwrap();

        let err = generate(&recipe, &RawOptions::new(), &layout).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::WriteFailure { .. })
        ));
    }

    #[test]
    fn test_regenerate_supersedes_previous_output() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("tinymcp").write_to(tmp.path());
        let layout = Layout::for_root(tmp.path());

        generate(&recipe, &RawOptions::new(), &layout).unwrap();
        std::fs::write(layout.generators_dir().join("old-config.cmake"), "").unwrap();

        let generated = generate(&recipe, &RawOptions::new(), &layout).unwrap();
        assert!(!layout.generators_dir().join("old-config.cmake").exists());
        assert!(generated.toolchain_file.is_file());
    }
}
