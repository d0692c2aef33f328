//! Failure reports printed when a command stops.
//!
//! A report names the failure and its code, the file it concerns, any
//! notes, the native tool's own output (forwarded untouched), and the
//! `tugboat` command worth running next.

use std::fmt;
use std::path::PathBuf;

/// Next steps shared by several failures.
pub mod suggestions {
    pub const NO_RECIPE: &str =
        "Run `tugboat` from a directory containing Tugboat.toml, or pass --recipe-dir";

    pub const STALE_BUILD: &str = "Run `tugboat build` to rebuild with the current toolchain";

    pub const BUILD_FAILED: &str = "Run `tugboat build --verbose` for more details";
}

const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// A failure report.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    /// One-line description of what failed
    pub headline: String,
    /// Stable code such as `tugboat::tool::failed`
    pub code: Option<String>,
    pub location: Option<PathBuf>,
    pub notes: Vec<String>,
    /// Output of the native tool, exactly as it was captured
    pub tool_output: Option<String>,
    pub next_steps: Vec<String>,
}

impl Diagnostic {
    pub fn error(headline: impl Into<String>) -> Self {
        Diagnostic {
            headline: headline.into(),
            ..Diagnostic::default()
        }
    }

    pub fn with_code(mut self, code: impl fmt::Display) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach captured tool streams, stdout first. Blank streams are dropped;
    /// the rest are kept byte for byte.
    pub fn with_tool_output(mut self, stdout: &str, stderr: &str) -> Self {
        let mut output = String::new();
        for stream in [stdout, stderr] {
            if stream.trim().is_empty() {
                continue;
            }
            output.push_str(stream);
            if !stream.ends_with('\n') {
                output.push('\n');
            }
        }
        if !output.is_empty() {
            self.tool_output = Some(output);
        }
        self
    }

    pub fn with_suggestion(mut self, step: impl Into<String>) -> Self {
        self.next_steps.push(step.into());
        self
    }

    /// Render for a terminal. With `color`, labels are wrapped in ANSI codes;
    /// tool output never is.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{}{}{}", code, text, RESET)
            } else {
                text.to_string()
            }
        };

        let label = match &self.code {
            Some(code) => format!("error[{}]", code),
            None => "error".to_string(),
        };
        let mut out = format!("{}: {}\n", paint(RED, &label), self.headline);

        if let Some(path) = &self.location {
            out.push_str(&format!("  --> {}\n", path.display()));
        }
        for note in &self.notes {
            out.push_str(&format!("  = {}\n", note));
        }

        if let Some(output) = &self.tool_output {
            out.push_str(&paint(DIM, "--- tool output ---"));
            out.push('\n');
            out.push_str(output);
            out.push_str(&paint(DIM, "---"));
            out.push('\n');
        }

        match self.next_steps.as_slice() {
            [] => {}
            [only] => out.push_str(&format!("{}: {}\n", paint(GREEN, "help"), only)),
            steps => {
                out.push_str(&format!("{}:\n", paint(GREEN, "help")));
                for (i, step) in steps.iter().enumerate() {
                    out.push_str(&format!("  {}. {}\n", i + 1, step));
                }
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a report to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
