//! External runner invocation.
//!
//! One process runs the whole batch:
//!
//! ```text
//! <runner...> <ns1> <ns2> ... :config <config-path>
//! ```
//!
//! The runner's own output is never parsed for results; those come from the report files. An exit status
//! from 1 up to [`FATAL_EXIT_THRESHOLD`] only means some tests failed. Anything above it (the shell's range
//! for "killed by a signal" and "could not execute") or below zero aborts the run.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tempfile::NamedTempFile;

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};

/// Highest exit status still treated as "tests ran, some failed".
pub const FATAL_EXIT_THRESHOLD: i32 = 125;

/// The namespaces of one run plus its ephemeral runner configuration file.
///
/// The configuration file is deleted when the `RunSpec` is dropped.
#[derive(Debug)]
pub struct RunSpec {
    namespaces: Vec<String>,
    config_file: NamedTempFile,
}

impl RunSpec {
    /// Write the configuration artifact and fix the namespace list.
    ///
    /// Repeated namespaces are kept once, at their first position.
    pub fn new(namespaces: Vec<String>, runner_config: &str) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        let namespaces: Vec<String> = namespaces.into_iter().filter(|ns| seen.insert(ns.clone())).collect();

        let mut config_file = tempfile::Builder::new()
            .prefix("nstest-")
            .suffix(".clj")
            .tempfile()
            .map_err(EngineError::ConfigArtifact)?;
        config_file
            .write_all(runner_config.as_bytes())
            .and_then(|()| config_file.flush())
            .map_err(EngineError::ConfigArtifact)?;

        Ok(Self { namespaces, config_file })
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn config_path(&self) -> &Path {
        self.config_file.path()
    }
}

/// How the runner process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Exit status 0
    Success { stdout: String, stderr: String },
    /// Exit status from 1 to [`FATAL_EXIT_THRESHOLD`]: some tests failed
    FailedExpected { exit_code: i32 },
    /// Killed, failed to run at all, or a negative (platform-specific) status
    FailedFatal { exit_code: i32, diagnostics: String },
}

impl InvocationOutcome {
    /// Classify a finished process by its exit status.
    pub fn from_exit(exit_code: i32, stdout: String, stderr: String) -> Self {
        if exit_code == 0 {
            InvocationOutcome::Success { stdout, stderr }
        } else if (1..=FATAL_EXIT_THRESHOLD).contains(&exit_code) {
            InvocationOutcome::FailedExpected { exit_code }
        } else {
            let diagnostics = if stderr.trim().is_empty() { stdout } else { stderr };
            InvocationOutcome::FailedFatal {
                exit_code,
                diagnostics: diagnostics.trim().to_string(),
            }
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, InvocationOutcome::FailedFatal { .. })
    }
}

/// Execute the external runner for a [`RunSpec`].
pub trait Runner {
    /// Human-readable program name, used in error messages.
    fn program(&self) -> &str;

    /// Run the batch and report how the process ended.
    ///
    /// Returns `Err` only when the process could not be started.
    fn invoke(&self, spec: &RunSpec) -> EngineResult<InvocationOutcome>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn program(&self) -> &str {
        (**self).program()
    }

    fn invoke(&self, spec: &RunSpec) -> EngineResult<InvocationOutcome> {
        (**self).invoke(spec)
    }
}

/// Spawn the configured runner command as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let (program, args) = config.runner.split_first().ok_or(EngineError::EmptyRunner)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: config.project_root.clone(),
        })
    }

    /// Build the command line for `spec` without running it.
    pub fn command(&self, spec: &RunSpec) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .args(spec.namespaces())
            .arg(":config")
            .arg(spec.config_path())
            .current_dir(&self.working_dir);
        command
    }
}

impl Runner for ProcessRunner {
    fn program(&self) -> &str {
        &self.program
    }

    #[tracing::instrument(skip_all, fields(program = %self.program, namespace_count = spec.namespaces().len()))]
    fn invoke(&self, spec: &RunSpec) -> EngineResult<InvocationOutcome> {
        let output = self.command(spec).output().map_err(|source| EngineError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        tracing::debug!(%stdout, %stderr, "runner output");

        let exit_code = exit_code_of(output.status);
        tracing::info!(exit_code, "runner finished");
        Ok(InvocationOutcome::from_exit(exit_code, stdout, stderr))
    }
}

/// Exit status as a shell would report it: signals map to `128 + signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(FATAL_EXIT_THRESHOLD + 1)
}
