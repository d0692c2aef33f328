//! Error taxonomy for the package lifecycle.
//!
//! Caller input errors (`InvalidOptionValue`, `UnknownOption`) are raised
//! before anything touches the filesystem. Native tool failures carry the
//! tool's exit status and output verbatim; they are never reclassified.

use std::fmt;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Native tool step that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStep {
    Configure,
    Build,
    Install,
}

impl fmt::Display for ToolStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStep::Configure => write!(f, "configure"),
            ToolStep::Build => write!(f, "build"),
            ToolStep::Install => write!(f, "install"),
        }
    }
}

/// Build driver state, persisted between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverState {
    Unconfigured,
    Configured,
    Built,
    Failed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Unconfigured => write!(f, "unconfigured"),
            DriverState::Configured => write!(f, "configured"),
            DriverState::Built => write!(f, "built"),
            DriverState::Failed => write!(f, "failed"),
        }
    }
}

/// Errors raised by the lifecycle components.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum Error {
    #[error("invalid value `{value}` for option `{option}` (expected {expected})")]
    #[diagnostic(code(tugboat::options::invalid_value))]
    InvalidOptionValue {
        option: String,
        value: String,
        expected: String,
    },

    #[error("unknown option `{option}`")]
    #[diagnostic(code(tugboat::options::unknown))]
    UnknownOption { option: String, known: Vec<String> },

    #[error("failed to write {}", .path.display())]
    #[diagnostic(
        code(tugboat::io::write_failure),
        help("check permissions and free space in the output directory")
    )]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{tool}` {step} step failed ({}){}", describe_status(.status), forward(.stdout, .stderr))]
    #[diagnostic(code(tugboat::tool::failed))]
    ToolFailure {
        tool: String,
        step: ToolStep,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("could not run `{tool}`: {message}")]
    #[diagnostic(
        code(tugboat::tool::unavailable),
        help("install CMake or point `--cmake` / `[tools] cmake` at it")
    )]
    ToolUnavailable { tool: String, message: String },

    #[error("install step failed ({}){}", describe_status(.status), forward(.stdout, .stderr))]
    #[diagnostic(code(tugboat::package::install_failure))]
    InstallFailure {
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("source file not found: {}", .path.display())]
    #[diagnostic(code(tugboat::package::missing_source))]
    MissingSourceFile { path: PathBuf },

    #[error("generated file not found: {}", .path.display())]
    #[diagnostic(
        code(tugboat::generate::missing),
        help("run `tugboat generate` first")
    )]
    MissingGeneratedFile { path: PathBuf },

    #[error("build tree is {found}, but {required} is required{}", stale_note(.stale))]
    #[diagnostic(code(tugboat::driver::phase_order))]
    PhaseOrder {
        required: DriverState,
        found: DriverState,
        stale: bool,
    },

    #[error("invalid recipe: {message}")]
    #[diagnostic(code(tugboat::recipe::invalid))]
    InvalidRecipe { message: String },

    #[error("invalid lock file: {message}")]
    #[diagnostic(code(tugboat::lock::invalid))]
    InvalidLock { message: String },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn stale_note(stale: &bool) -> &'static str {
    if *stale {
        " (generated files changed since)"
    } else {
        ""
    }
}

/// Append the tool's raw output, untouched.
fn forward(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    for stream in [stdout, stderr] {
        if !stream.trim().is_empty() {
            out.push('\n');
            out.push_str(stream.trim_end());
        }
    }
    out
}

impl Error {
    /// Build a `WriteFailure` for `path`.
    pub fn write_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::WriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Convert to a failure report. Tool output moves out of the headline
    /// into its own block.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = self.to_string();
        let headline = match self {
            Error::ToolFailure { .. } | Error::InstallFailure { .. } => {
                message.lines().next().unwrap_or_default()
            }
            _ => message.as_str(),
        };
        let mut diag = Diagnostic::error(headline);
        if let Some(code) = MietteDiagnostic::code(self) {
            diag = diag.with_code(code);
        }

        match self {
            Error::InvalidOptionValue { option, .. } => diag.with_suggestion(format!(
                "Pass a valid value with `-o {}=<value>`",
                option
            )),
            Error::UnknownOption { known, .. } => {
                let diag = diag.with_note(format!("known options: {}", known.join(", ")));
                diag.with_suggestion("Check the option name for typos")
            }
            Error::WriteFailure { path, source } => diag
                .with_location(path.clone())
                .with_note(source.to_string())
                .with_suggestion("Check permissions and free space in the output directory"),
            Error::ToolUnavailable { .. } => diag
                .with_suggestion("Install CMake and ensure it's in your PATH")
                .with_suggestion("Or set `--cmake <PATH>` / `[tools] cmake` in config.toml"),
            Error::MissingSourceFile { path } => diag
                .with_location(path.clone())
                .with_suggestion("Add the file to the source tree or set `license_file` in Tugboat.toml"),
            Error::MissingGeneratedFile { .. } => {
                diag.with_suggestion("Run `tugboat generate` first")
            }
            Error::PhaseOrder { stale: true, .. } => diag.with_suggestion(suggestions::STALE_BUILD),
            Error::PhaseOrder { required, .. } => diag.with_suggestion(match required {
                DriverState::Built => "Run `tugboat build` before packaging",
                _ => "Run `tugboat generate` and `tugboat build` again",
            }),
            Error::InvalidRecipe { .. } => diag.with_suggestion("Fix Tugboat.toml and retry"),
            Error::InvalidLock { .. } => {
                diag.with_suggestion("Regenerate Tugboat.lock with the dependency resolver")
            }
            Error::ToolFailure { stdout, stderr, .. } => diag
                .with_tool_output(stdout, stderr)
                .with_suggestion(suggestions::BUILD_FAILED),
            Error::InstallFailure { stdout, stderr, .. } => diag.with_tool_output(stdout, stderr),
        }
    }
}
