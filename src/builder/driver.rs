//! Build driver: configure then build, with typed phase tokens.
//!
//! `configure` yields a [`Configured`] token and `build` consumes one,
//! yielding a [`Built`] token the installer consumes in turn. Calling the
//! phases out of order does not type-check. Across separate invocations the
//! tokens are recovered from the state file in the build directory with
//! `resume`, which checks both the recorded state and that the generated
//! toolchain and dependency descriptors have not changed since.
//!
//! State machine: `Unconfigured -> Configured -> Built`, with `Failed`
//! reachable from either step. A failure is final for the invocation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::cmake::{BuildRequest, ConfigureRequest, NativeBuildTool, ToolOutput};
use crate::core::errors::{DriverState, Error, ToolStep};
use crate::generate::GeneratedFiles;
use crate::util::fs::{ensure_dir, write_atomic};

/// State file kept in the build directory.
pub const STATE_FILE: &str = "tugboat-state.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StateRecord {
    state: DriverState,
    source_dir: PathBuf,
    build_type: String,
    inputs_fingerprint: String,
}

impl StateRecord {
    fn load(build_dir: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(build_dir.join(STATE_FILE)).ok()?;
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("ignoring unreadable state file in {}: {}", build_dir.display(), e);
                None
            }
        }
    }

    fn save(&self, build_dir: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self).unwrap_or_default();
        write_atomic(&build_dir.join(STATE_FILE), json.as_bytes())
    }
}

/// Current driver state of a build directory.
pub fn state(build_dir: &Path) -> DriverState {
    StateRecord::load(build_dir)
        .map(|r| r.state)
        .unwrap_or(DriverState::Unconfigured)
}

/// Proof that configure succeeded for a build directory.
#[derive(Debug)]
pub struct Configured {
    source_dir: PathBuf,
    build_dir: PathBuf,
    build_type: String,
    fingerprint: String,
}

/// Proof that build succeeded for a build directory.
#[derive(Debug)]
pub struct Built {
    source_dir: PathBuf,
    build_dir: PathBuf,
    build_type: String,
    fingerprint: String,
}

fn resume_record(
    build_dir: &Path,
    generated: &GeneratedFiles,
    required: DriverState,
    accepted: &[DriverState],
) -> Result<StateRecord, Error> {
    let record = StateRecord::load(build_dir).ok_or(Error::PhaseOrder {
        required,
        found: DriverState::Unconfigured,
        stale: false,
    })?;

    if !accepted.contains(&record.state) {
        return Err(Error::PhaseOrder {
            required,
            found: record.state,
            stale: false,
        });
    }

    if record.inputs_fingerprint != generated.fingerprint() {
        return Err(Error::PhaseOrder {
            required,
            found: record.state,
            stale: true,
        });
    }

    Ok(record)
}

impl Configured {
    /// Recover the token from a build directory configured earlier.
    pub fn resume(build_dir: &Path, generated: &GeneratedFiles) -> Result<Self, Error> {
        let record = resume_record(
            build_dir,
            generated,
            DriverState::Configured,
            &[DriverState::Configured, DriverState::Built],
        )?;

        Ok(Configured {
            source_dir: record.source_dir,
            build_dir: build_dir.to_path_buf(),
            build_type: record.build_type,
            fingerprint: record.inputs_fingerprint,
        })
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

impl Built {
    /// Recover the token from a build directory built earlier.
    pub fn resume(build_dir: &Path, generated: &GeneratedFiles) -> Result<Self, Error> {
        let record = resume_record(
            build_dir,
            generated,
            DriverState::Built,
            &[DriverState::Built],
        )?;

        Ok(Built {
            source_dir: record.source_dir,
            build_dir: build_dir.to_path_buf(),
            build_type: record.build_type,
            fingerprint: record.inputs_fingerprint,
        })
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_type(&self) -> &str {
        &self.build_type
    }

    /// Fingerprint of the toolchain the tree was built with.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Drives the native tool's configure and build steps.
pub struct BuildDriver<'a> {
    tool: &'a dyn NativeBuildTool,
    jobs: Option<usize>,
    verbose: bool,
}

impl<'a> BuildDriver<'a> {
    pub fn new(tool: &'a dyn NativeBuildTool) -> Self {
        BuildDriver {
            tool,
            jobs: None,
            verbose: false,
        }
    }

    /// Set parallel job count.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Ask the native tool for verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the configure step against the generated files.
    pub fn configure(
        &self,
        source_dir: &Path,
        generated: &GeneratedFiles,
        build_dir: &Path,
    ) -> Result<Configured, Error> {
        if !generated.toolchain_file.is_file() {
            return Err(Error::MissingGeneratedFile {
                path: generated.toolchain_file.clone(),
            });
        }
        ensure_dir(build_dir)?;

        let mut record = StateRecord {
            state: DriverState::Unconfigured,
            source_dir: source_dir.to_path_buf(),
            build_type: generated.toolchain.build_type().to_string(),
            inputs_fingerprint: generated.fingerprint().to_string(),
        };
        record.save(build_dir)?;

        tracing::info!("configuring {}", source_dir.display());
        let output = self.tool.configure(&ConfigureRequest {
            source_dir,
            build_dir,
            toolchain_file: &generated.toolchain_file,
            build_type: &record.build_type,
        });
        self.check(ToolStep::Configure, output, &mut record, build_dir)?;

        record.state = DriverState::Configured;
        record.save(build_dir)?;

        Ok(Configured {
            source_dir: record.source_dir,
            build_dir: build_dir.to_path_buf(),
            build_type: record.build_type,
            fingerprint: record.inputs_fingerprint,
        })
    }

    /// Run the build step; consumes the configure token.
    pub fn build(&self, configured: Configured) -> Result<Built, Error> {
        let mut record = StateRecord {
            state: DriverState::Configured,
            source_dir: configured.source_dir,
            build_type: configured.build_type,
            inputs_fingerprint: configured.fingerprint,
        };
        let build_dir = configured.build_dir;

        tracing::info!("building in {}", build_dir.display());
        let output = self.tool.build(&BuildRequest {
            build_dir: &build_dir,
            build_type: &record.build_type,
            jobs: self.jobs,
            verbose: self.verbose,
        });
        self.check(ToolStep::Build, output, &mut record, &build_dir)?;

        record.state = DriverState::Built;
        record.save(&build_dir)?;

        Ok(Built {
            source_dir: record.source_dir,
            build_dir,
            build_type: record.build_type,
            fingerprint: record.inputs_fingerprint,
        })
    }

    /// Record `Failed` and forward the tool's output on any failure.
    fn check(
        &self,
        step: ToolStep,
        output: Result<ToolOutput, Error>,
        record: &mut StateRecord,
        build_dir: &Path,
    ) -> Result<(), Error> {
        let err = match output {
            Ok(out) if out.is_success() => {
                if !out.stdout.is_empty() {
                    tracing::debug!("{} output:\n{}", step, out.stdout.trim_end());
                }
                return Ok(());
            }
            Ok(out) => Error::ToolFailure {
                tool: self.tool.name().to_string(),
                step,
                status: out.status,
                stdout: out.stdout,
                stderr: out.stderr,
            },
            Err(e) => e,
        };

        record.state = DriverState::Failed;
        if let Err(save_err) = record.save(build_dir) {
            tracing::warn!("could not record failed state: {}", save_err);
        }
        Err(err)
    }
}
