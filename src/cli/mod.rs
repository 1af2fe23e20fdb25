//! CLI module for nstest
//!
//! ## Commands
//!
//! - `run [--all] [PATH...]` - Select tests for the changed paths (or all tests), run them, report results
//! - `select [--all] [PATH...]` - Print the namespaces a run would execute, without running anything
//! - `resolve <PATH>` - Print the test namespace covering one source file
//!
//! A single `-` in the path list reads newline-separated paths from stdin.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod reporter;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::EngineConfig;
use crate::version::NSTEST_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// Tests ran and some failed or errored
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run itself could not complete
    pub const ERROR: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an engine error (exit code 2).
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::ERROR)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run the tests covering changed source files
#[derive(Parser, Debug)]
#[command(name = "nstest")]
#[command(version = NSTEST_VERSION)]
#[command(about = "Run the test namespaces covering changed source files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub project: ProjectArgs,
}

impl Cli {
    /// Tracing filter used when `RUST_LOG` is unset: `debug` for `run --verbose`, `info` otherwise.
    pub fn default_log_filter(&self) -> &'static str {
        match self.command {
            Command::Run { verbose: true, .. } => "debug",
            _ => "info",
        }
    }
}

/// Project layout and runner options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root; test roots, reports and changed paths are relative to it
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Test root directory (repeatable, searched in order) [default: test]
    #[arg(long = "test-root", global = true, value_name = "DIR")]
    pub test_roots: Vec<String>,

    /// Supported source extension (repeatable) [default: clj, cljs, cljc]
    #[arg(long = "ext", global = true, value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Prefix added to a source file stem to name its test [default: test_]
    #[arg(long, global = true, value_name = "PREFIX")]
    pub test_prefix: Option<String>,

    /// Suffix added to a source file stem to name its test [default: none]
    #[arg(long, global = true, value_name = "SUFFIX")]
    pub test_suffix: Option<String>,

    /// Runner command line, split on whitespace [default: "lein midje"]
    #[arg(long, global = true, value_name = "COMMAND")]
    pub runner: Option<String>,

    /// Directory holding TEST-<namespace>.xml reports [default: target/surefire-reports]
    #[arg(long, global = true, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
}

impl ProjectArgs {
    /// Overlay the given flags on the default configuration.
    pub fn to_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new().with_project_root(&self.project_root);
        if !self.test_roots.is_empty() {
            config = config.with_test_roots(self.test_roots.iter().cloned());
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(self.extensions.iter().cloned());
        }
        if let Some(prefix) = &self.test_prefix {
            config = config.with_test_prefix(prefix);
        }
        if let Some(suffix) = &self.test_suffix {
            config = config.with_test_suffix(suffix);
        }
        if let Some(runner) = &self.runner {
            config = config.with_runner(runner.split_whitespace());
        }
        if let Some(dir) = &self.report_dir {
            config = config.with_report_dir(dir);
        }
        config
    }
}

/// Paths to select tests for, or `--all`.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Run every test under every test root
    #[arg(long, conflicts_with = "paths")]
    pub all: bool,

    /// Changed source paths (`-` reads them from stdin)
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the selected tests and report their results
    Run {
        #[command(flatten)]
        selection: SelectionArgs,
        /// List passing tests and durations too
        #[arg(short, long)]
        verbose: bool,
        /// Result output format
        #[arg(long, value_enum, default_value = "console")]
        format: OutputFormat,
        /// Disable colored console output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the namespaces a run would execute
    Select {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Print the test namespace covering a source file
    Resolve {
        /// Source file path
        #[arg(value_name = "PATH")]
        path: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run(cli: Cli) {
    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.project.to_config();

    match cli.command {
        Command::Run {
            selection,
            verbose,
            format,
            no_color,
        } => {
            let selection = commands::read_selection(&selection)?;
            commands::run_tests(&config, &selection, format, verbose, !no_color)
        }
        Command::Select { selection } => {
            let selection = commands::read_selection(&selection)?;
            commands::print_selection(&config, &selection)
        }
        Command::Resolve { path } => commands::resolve_path(&config, &path),
    }
}

// ============================================================================
// Tests
// ============================================================================
