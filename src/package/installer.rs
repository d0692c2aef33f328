//! Package installer: native install step plus auxiliary file staging.

use std::path::{Path, PathBuf};

use crate::builder::cmake::{InstallRequest, NativeBuildTool};
use crate::builder::driver::Built;
use crate::core::errors::Error;
use crate::core::recipe::Recipe;
use crate::util::fs::{copy_into, ensure_dir, list_files};

/// Subdirectory of the package tree holding license files.
pub const LICENSES_DIR: &str = "licenses";

/// An installed package tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTree {
    root: PathBuf,
}

impl PackageTree {
    /// Open a package tree installed by an earlier invocation.
    pub fn open(root: &Path) -> Option<Self> {
        root.is_dir().then(|| PackageTree {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installed files, relative to the root, sorted.
    pub fn files(&self) -> anyhow::Result<Vec<PathBuf>> {
        list_files(&self.root)
    }
}

/// A file copied verbatim into a subdirectory of the package tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryFile {
    pub source: PathBuf,
    pub subdir: PathBuf,
}

impl AuxiliaryFile {
    /// The recipe's license file, staged into `licenses/`.
    pub fn license(recipe: &Recipe) -> Self {
        AuxiliaryFile {
            source: recipe.license_path(),
            subdir: PathBuf::from(LICENSES_DIR),
        }
    }
}

/// Run the native install step into `package_dir`.
///
/// Consumes the `Built` token: the build tree belongs to the installer from
/// here on. Any previous package tree at `package_dir` is replaced.
pub fn install(
    tool: &dyn NativeBuildTool,
    built: Built,
    package_dir: &Path,
) -> Result<PackageTree, Error> {
    if package_dir.exists() {
        std::fs::remove_dir_all(package_dir).map_err(|e| Error::write_failure(package_dir, e))?;
    }
    ensure_dir(package_dir)?;

    tracing::info!("installing into {}", package_dir.display());
    let output = tool.install(&InstallRequest {
        build_dir: built.build_dir(),
        build_type: built.build_type(),
        prefix: package_dir,
    })?;

    if !output.is_success() {
        return Err(Error::InstallFailure {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    Ok(PackageTree {
        root: package_dir.to_path_buf(),
    })
}

/// Copy auxiliary files into the package tree, unchanged.
///
/// Every source is checked before anything is copied. Nothing already
/// installed is rolled back on failure.
pub fn stage_auxiliary(files: &[AuxiliaryFile], tree: &PackageTree) -> Result<Vec<PathBuf>, Error> {
    if let Some(missing) = files.iter().find(|f| !f.source.is_file()) {
        return Err(Error::MissingSourceFile {
            path: missing.source.clone(),
        });
    }

    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let dest = copy_into(&file.source, &tree.root.join(&file.subdir))?;
        tracing::debug!("staged {}", dest.display());
        staged.push(dest);
    }
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::cmake::ToolOutput;
    use crate::builder::driver::BuildDriver;
    use crate::core::errors::ToolStep;
    use crate::test_support::{generated_files, FakeTool, ProjectFixture};
    use tempfile::TempDir;

    fn built(tool: &FakeTool, dir: &Path) -> Built {
        let generated = generated_files(dir, false);
        let driver = BuildDriver::new(tool);
        let configured = driver
            .configure(dir, &generated, &dir.join("build"))
            .unwrap();
        driver.build(configured).unwrap()
    }

    #[test]
    fn test_install_and_stage_license() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("demo").write_to(&tmp.path().join("src"));
        let tool = FakeTool::new();

        let tree = install(&tool, built(&tool, tmp.path()), &tmp.path().join("package")).unwrap();
        let staged = stage_auxiliary(&[AuxiliaryFile::license(&recipe)], &tree).unwrap();

        assert_eq!(staged, vec![tmp.path().join("package/licenses/LICENSE")]);
        assert_eq!(
            std::fs::read_to_string(&staged[0]).unwrap(),
            std::fs::read_to_string(recipe.license_path()).unwrap()
        );
        assert_eq!(
            tree.files().unwrap(),
            vec![
                PathBuf::from("include/demo.h"),
                PathBuf::from("lib/libdemo.a"),
                PathBuf::from("licenses/LICENSE"),
            ]
        );
    }

    #[test]
    fn test_install_failure_forwards_output() {
        let tmp = TempDir::new().unwrap();
        let tool = FakeTool::new().fail_on(
            ToolStep::Install,
            ToolOutput::failure(1, "CMake Error: cannot install to /root"),
        );

        let err = install(&tool, built(&tool, tmp.path()), &tmp.path().join("package")).unwrap_err();
        match err {
            Error::InstallFailure { status, stderr, .. } => {
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "CMake Error: cannot install to /root");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_license_leaves_install_in_place() {
        let tmp = TempDir::new().unwrap();
        let recipe = ProjectFixture::library("demo")
            .without("LICENSE")
            .write_to(&tmp.path().join("src"));
        let tool = FakeTool::new();

        let tree = install(&tool, built(&tool, tmp.path()), &tmp.path().join("package")).unwrap();
        let err = stage_auxiliary(&[AuxiliaryFile::license(&recipe)], &tree).unwrap_err();

        assert!(matches!(err, Error::MissingSourceFile { .. }));
        assert!(tree.root().join("lib/libdemo.a").is_file());
        assert!(!tree.root().join(LICENSES_DIR).exists());
    }

    #[test]
    fn test_reinstall_replaces_previous_tree() {
        let tmp = TempDir::new().unwrap();
        let package_dir = tmp.path().join("package");
        std::fs::create_dir_all(package_dir.join("stale")).unwrap();
        std::fs::write(package_dir.join("stale/old.txt"), "old").unwrap();
        let tool = FakeTool::new();

        let tree = install(&tool, built(&tool, tmp.path()), &package_dir).unwrap();
        assert!(!tree.root().join("stale").exists());
    }

    #[test]
    fn test_open_requires_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(PackageTree::open(&tmp.path().join("nope")).is_none());
        assert!(PackageTree::open(tmp.path()).is_some());
    }
}
