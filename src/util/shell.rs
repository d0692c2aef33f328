//! Centralized shell output and progress management.
//!
//! The Shell provides a unified API for user-facing output:
//! - Status messages with consistent right-aligned formatting
//! - A spinner (via indicatif) while a native tool step runs
//!
//! Commands never manage spacing or colors directly. Diagnostics that are
//! not meant for the user go through `tracing` instead.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no spinner
    Quiet,
    /// Default: status messages + spinner
    #[default]
    Normal,
    /// --verbose: status messages, debug logs, no spinner
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors when stderr is a terminal.
    #[default]
    Auto,
    /// --no-color
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Created,
    Exported,
    Finished,
    Packaged,
    Published,
    Removed,

    // In-progress statuses (cyan)
    Generating,
    Building,
    Installing,
    Staging,

    // Info statuses (blue)
    Info,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "Created",
            Status::Exported => "Exported",
            Status::Finished => "Finished",
            Status::Packaged => "Packaged",
            Status::Published => "Published",
            Status::Removed => "Removed",
            Status::Generating => "Generating",
            Status::Building => "Building",
            Status::Installing => "Installing",
            Status::Staging => "Staging",
            Status::Info => "Info",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Created
            | Status::Exported
            | Status::Finished
            | Status::Packaged
            | Status::Published
            | Status::Removed => "\x1b[1;32m",
            Status::Generating
            | Status::Building
            | Status::Installing
            | Status::Staging => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
        }
    }
}

/// Status column width.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    interactive: bool,
}

impl Shell {
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let interactive = io::stderr().is_terminal();
        let use_color = match color {
            ColorChoice::Auto => interactive,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            interactive,
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`. Nothing is printed in quiet mode;
    /// errors are reported separately.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Print the status line and start a spinner for a long-running step.
    ///
    /// The spinner is only drawn on an interactive terminal in normal mode.
    pub fn spinner(&self, status: Status, msg: impl Display) -> Spinner {
        let msg = msg.to_string();
        self.status(status, &msg);

        let pb = if self.interactive && self.verbosity == Verbosity::Normal {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(msg);
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        Spinner {
            pb,
            start: Instant::now(),
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// A running spinner, cleared when finished or dropped.
pub struct Spinner {
    pb: Option<ProgressBar>,
    start: Instant,
}

impl Spinner {
    /// Clear the spinner and return the elapsed time.
    pub fn finish(mut self) -> Duration {
        self.clear();
        self.start.elapsed()
    }

    fn clear(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Format a duration in a human-readable way.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0.50s");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(Verbosity::Normal, ColorChoice::Never);

        let formatted = shell.format_status(Status::Packaged);
        assert_eq!(formatted.trim(), "Packaged");
        assert_eq!(formatted.len(), STATUS_WIDTH);
    }

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, false, ColorChoice::Never);
        assert_eq!(shell.verbosity, Verbosity::Normal);
        assert!(!shell.use_color());

        assert!(Shell::from_flags(true, false, ColorChoice::Never).is_quiet());
        assert_eq!(
            Shell::from_flags(false, true, ColorChoice::Never).verbosity,
            Verbosity::Verbose
        );
        // Quiet takes precedence
        assert!(Shell::from_flags(true, true, ColorChoice::Never).is_quiet());
    }

    #[test]
    fn test_spinner_without_terminal_is_silent() {
        let shell = Shell::new(Verbosity::Quiet, ColorChoice::Never);
        let spinner = shell.spinner(Status::Building, "demo");
        assert!(spinner.pb.is_none());
        spinner.finish();
    }
}
