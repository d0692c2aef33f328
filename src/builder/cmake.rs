//! Native build tool seam and the CMake implementation.

use std::path::{Path, PathBuf};
use std::process::Output;

use crate::core::errors::Error;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Exit status and raw output of one native tool step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success() -> Self {
        ToolOutput {
            status: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        ToolOutput {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Inputs of the configure step.
#[derive(Debug, Clone)]
pub struct ConfigureRequest<'a> {
    pub source_dir: &'a Path,
    pub build_dir: &'a Path,
    pub toolchain_file: &'a Path,
    pub build_type: &'a str,
}

/// Inputs of the build step.
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    pub build_dir: &'a Path,
    pub build_type: &'a str,
    pub jobs: Option<usize>,
    pub verbose: bool,
}

/// Inputs of the install step.
#[derive(Debug, Clone)]
pub struct InstallRequest<'a> {
    pub build_dir: &'a Path,
    pub build_type: &'a str,
    pub prefix: &'a Path,
}

/// A native build tool with configure/build/install steps.
///
/// Implementations return the step's output whatever its status; deciding
/// what a non-zero status means is the caller's job. An `Err` means the
/// tool could not be run at all.
pub trait NativeBuildTool {
    fn name(&self) -> &str;

    fn configure(&self, req: &ConfigureRequest<'_>) -> Result<ToolOutput, Error>;

    fn build(&self, req: &BuildRequest<'_>) -> Result<ToolOutput, Error>;

    fn install(&self, req: &InstallRequest<'_>) -> Result<ToolOutput, Error>;
}

/// CMake driven through its command line.
#[derive(Debug, Clone)]
pub struct CMakeTool {
    program: PathBuf,
    generator: Option<String>,
}

impl CMakeTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CMakeTool {
            program: program.into(),
            generator: None,
        }
    }

    /// Locate `cmake` in PATH.
    pub fn discover() -> Result<Self, Error> {
        find_cmake().map(CMakeTool::new).ok_or_else(|| Error::ToolUnavailable {
            tool: "cmake".to_string(),
            message: "not found in PATH".to_string(),
        })
    }

    /// Use a specific CMake generator (e.g. "Ninja").
    pub fn with_generator(mut self, generator: Option<String>) -> Self {
        self.generator = generator;
        self
    }

    pub fn configure_args(&self, req: &ConfigureRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            req.source_dir.display().to_string(),
            "-B".to_string(),
            req.build_dir.display().to_string(),
        ];

        if let Some(ref generator) = self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }

        args.push(format!(
            "-DCMAKE_TOOLCHAIN_FILE={}",
            req.toolchain_file.display()
        ));
        args
    }

    pub fn build_args(&self, req: &BuildRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            req.build_dir.display().to_string(),
            // Multi-config generators ignore CMAKE_BUILD_TYPE
            "--config".to_string(),
            req.build_type.to_string(),
        ];

        if let Some(jobs) = req.jobs {
            args.push("--parallel".to_string());
            args.push(jobs.to_string());
        }

        if req.verbose {
            args.push("--verbose".to_string());
        }

        args
    }

    pub fn install_args(&self, req: &InstallRequest<'_>) -> Vec<String> {
        vec![
            "--install".to_string(),
            req.build_dir.display().to_string(),
            "--config".to_string(),
            req.build_type.to_string(),
            "--prefix".to_string(),
            req.prefix.display().to_string(),
        ]
    }

    fn run(&self, args: Vec<String>) -> Result<ToolOutput, Error> {
        let cmd = ProcessBuilder::new(&self.program).args(&args);
        tracing::debug!("running {}", cmd.display_command());

        let output = cmd.exec().map_err(|e| Error::ToolUnavailable {
            tool: self.program.display().to_string(),
            message: format!("{:#}", e),
        })?;

        Ok(output.into())
    }
}

impl NativeBuildTool for CMakeTool {
    fn name(&self) -> &str {
        "cmake"
    }

    fn configure(&self, req: &ConfigureRequest<'_>) -> Result<ToolOutput, Error> {
        self.run(self.configure_args(req))
    }

    fn build(&self, req: &BuildRequest<'_>) -> Result<ToolOutput, Error> {
        self.run(self.build_args(req))
    }

    fn install(&self, req: &InstallRequest<'_>) -> Result<ToolOutput, Error> {
        self.run(self.install_args(req))
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_args() {
        let tool = CMakeTool::new("cmake").with_generator(Some("Ninja".to_string()));
        let args = tool.configure_args(&ConfigureRequest {
            source_dir: Path::new("/src"),
            build_dir: Path::new("/out/build"),
            toolchain_file: Path::new("/out/generators/tugboat_toolchain.cmake"),
            build_type: "Release",
        });

        assert_eq!(
            args,
            vec![
                "-S",
                "/src",
                "-B",
                "/out/build",
                "-G",
                "Ninja",
                "-DCMAKE_TOOLCHAIN_FILE=/out/generators/tugboat_toolchain.cmake",
            ]
        );
    }

    #[test]
    fn test_build_args() {
        let tool = CMakeTool::new("cmake");
        let args = tool.build_args(&BuildRequest {
            build_dir: Path::new("/out/build"),
            build_type: "Debug",
            jobs: Some(4),
            verbose: true,
        });

        assert_eq!(
            args,
            vec![
                "--build",
                "/out/build",
                "--config",
                "Debug",
                "--parallel",
                "4",
                "--verbose"
            ]
        );
    }

    #[test]
    fn test_install_args() {
        let tool = CMakeTool::new("cmake");
        let args = tool.install_args(&InstallRequest {
            build_dir: Path::new("/out/build"),
            build_type: "Release",
            prefix: Path::new("/out/package"),
        });

        assert_eq!(
            args,
            vec![
                "--install",
                "/out/build",
                "--config",
                "Release",
                "--prefix",
                "/out/package"
            ]
        );
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let tool = CMakeTool::new("/nonexistent/cmake");
        let err = tool
            .build(&BuildRequest {
                build_dir: Path::new("/tmp"),
                build_type: "Release",
                jobs: None,
                verbose: false,
            })
            .unwrap_err();

        assert!(matches!(err, Error::ToolUnavailable { .. }));
    }

    #[test]
    fn test_is_cmake_project() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        assert!(!is_cmake_project(tmp.path()));

        std::fs::write(
            tmp.path().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.16)",
        )
        .unwrap();
        assert!(is_cmake_project(tmp.path()));
    }
}
