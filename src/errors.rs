//! Engine error taxonomy.
//!
//! "No tests to run" is not an error here: it is the [`RunOutcome::NoTests`](crate::engine::RunOutcome) variant,
//! a no-op outcome rather than a failure. Runner exits that only signal failing tests never become errors either.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::report::{ParseError, TestResultRecord};

/// A per-namespace problem with the structured report the runner should have produced.
#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("report for `{namespace}` is missing or unreadable ({})", .path.display())]
    #[diagnostic(
        code(nstest::report::missing),
        help("the runner did not write a report for this namespace; it may have failed to load")
    )]
    Missing {
        namespace: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("report for `{namespace}` could not be parsed ({})", .path.display())]
    #[diagnostic(code(nstest::report::parse))]
    Parse {
        namespace: String,
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl ReportError {
    /// Namespace whose report failed.
    pub fn namespace(&self) -> &str {
        match self {
            ReportError::Missing { namespace, .. } | ReportError::Parse { namespace, .. } => namespace,
        }
    }
}

/// Errors that abort a run.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("failed to enumerate test root {}", .root.display())]
    #[diagnostic(code(nstest::discovery))]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write the runner configuration file")]
    #[diagnostic(code(nstest::config_artifact))]
    ConfigArtifact(#[source] io::Error),

    #[error("no runner command configured")]
    #[diagnostic(code(nstest::empty_runner), help("pass --runner, e.g. --runner \"lein midje\""))]
    EmptyRunner,

    #[error("failed to start `{program}`")]
    #[diagnostic(code(nstest::spawn), help("is the runner installed and on PATH?"))]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` was killed or could not run (exit status {exit_code})\n{diagnostics}")]
    #[diagnostic(code(nstest::invocation))]
    Invocation {
        program: String,
        exit_code: i32,
        diagnostics: String,
    },

    #[error("{} report(s) could not be read; {} result(s) were parsed from the rest", .failures.len(), .partial.len())]
    #[diagnostic(code(nstest::incomplete_reports))]
    IncompleteReports {
        #[related]
        failures: Vec<ReportError>,
        partial: Vec<TestResultRecord>,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
