//! Filesystem utilities.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use walkdir::WalkDir;

use crate::core::errors::Error;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), Error> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| Error::write_failure(path, e))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), Error> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| Error::write_failure(path, e))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Mode of every file written through [`write_atomic`].
#[cfg(unix)]
pub const PUBLISHED_MODE: u32 = 0o644;

/// Replace `path` with `contents` in one step.
///
/// The data goes to a temporary file in the same directory first, so a
/// reader never sees a half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut tmp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::write_failure(path, e))?;
    tmp.write_all(contents)
        .map_err(|e| Error::write_failure(path, e))?;

    // Temp files start out owner-only; generated and published files are
    // read by other users and tools.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(PUBLISHED_MODE))
            .map_err(|e| Error::write_failure(path, e))?;
    }

    tmp.persist(path)
        .map_err(|e| Error::write_failure(path, e.error))?;
    Ok(())
}

/// Copy one file into `dest_dir`, keeping its file name.
pub fn copy_into(src: &Path, dest_dir: &Path) -> Result<PathBuf, Error> {
    if !src.is_file() {
        return Err(Error::MissingSourceFile {
            path: src.to_path_buf(),
        });
    }

    ensure_dir(dest_dir)?;
    let file_name = src.file_name().ok_or_else(|| Error::MissingSourceFile {
        path: src.to_path_buf(),
    })?;
    let dest = dest_dir.join(file_name);
    fs::copy(src, &dest).map_err(|e| Error::write_failure(&dest, e))?;
    Ok(dest)
}

/// Find files matching glob patterns relative to a base directory.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in
            glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// List every file under `root`, relative to it, sorted.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() {
            files.push(relative_path(root, entry.path()));
        }
    }

    Ok(files)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.c"), "int main() {}").unwrap();
        fs::write(src.join("util.c"), "void util() {}").unwrap();
        fs::write(src.join("readme.txt"), "readme").unwrap();

        let files = glob_files(tmp.path(), &["src/**/*.c".to_string()]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gen").join("file.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_write_atomic_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tugboat-info.json");
        write_atomic(&path, b"{}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, PUBLISHED_MODE);
    }

    #[test]
    fn test_remove_failure_is_write_failure() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("generators");
        fs::write(&not_a_dir, "").unwrap();

        let err = remove_dir_all_if_exists(&not_a_dir).unwrap_err();
        assert!(matches!(err, Error::WriteFailure { .. }));
    }

    #[test]
    fn test_copy_into_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = copy_into(&tmp.path().join("LICENSE"), &tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::MissingSourceFile { .. }));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_list_files_is_relative_and_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::create_dir_all(tmp.path().join("include")).unwrap();
        fs::write(tmp.path().join("lib/libx.a"), "").unwrap();
        fs::write(tmp.path().join("include/x.h"), "").unwrap();

        let files = list_files(tmp.path()).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("include/x.h"), PathBuf::from("lib/libx.a")]
        );
    }
}
