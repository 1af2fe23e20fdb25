//! Run orchestration: select namespaces, invoke the runner once, aggregate the reports.

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::report::{self, TestResultRecord};
use crate::resolver::NamespaceResolver;
use crate::runner::{InvocationOutcome, RunSpec, Runner};
use crate::test_set::TestSetBuilder;

/// Which tests a run should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every test under every test root
    All,
    /// Tests covering these changed paths (relative to the project root)
    Changed(Vec<String>),
}

/// Result of a run that did not fail.
#[derive(Debug)]
pub enum RunOutcome {
    /// The selection was empty; the runner was not invoked.
    NoTests,
    /// The namespaces handed to the runner, and their records in namespace order.
    Completed {
        namespaces: Vec<String>,
        records: Vec<TestResultRecord>,
    },
}

/// Compute the namespaces a selection maps to, without running anything.
pub fn select(config: &EngineConfig, selection: &Selection) -> EngineResult<Vec<String>> {
    let builder = TestSetBuilder::new(NamespaceResolver::new(config));
    match selection {
        Selection::All => builder.build_all(),
        Selection::Changed(paths) => Ok(builder.build_for_changed_paths(paths.as_slice())),
    }
}

/// Drives one run per call; holds no state between runs.
pub struct Engine<'a, R: Runner> {
    config: &'a EngineConfig,
    runner: R,
}

impl<'a, R: Runner> Engine<'a, R> {
    pub fn new(config: &'a EngineConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Compute the namespaces a selection maps to.
    pub fn select(&self, selection: &Selection) -> EngineResult<Vec<String>> {
        select(self.config, selection)
    }

    /// Select, invoke and aggregate.
    #[tracing::instrument(skip_all)]
    pub fn run(&self, selection: &Selection) -> EngineResult<RunOutcome> {
        let namespaces = self.select(selection)?;
        if namespaces.is_empty() {
            tracing::info!("no tests to run");
            return Ok(RunOutcome::NoTests);
        }

        let spec = RunSpec::new(namespaces, &self.config.runner_config)?;
        tracing::info!(namespaces = ?spec.namespaces(), "running tests");

        match self.runner.invoke(&spec)? {
            InvocationOutcome::Success { .. } => {}
            InvocationOutcome::FailedExpected { exit_code } => {
                tracing::debug!(exit_code, "runner reported failing tests");
            }
            InvocationOutcome::FailedFatal { exit_code, diagnostics } => {
                return Err(EngineError::Invocation {
                    program: self.runner.program().to_string(),
                    exit_code,
                    diagnostics,
                });
            }
        }

        let records = report::aggregate(self.config, spec.namespaces()).into_result()?;
        Ok(RunOutcome::Completed {
            namespaces: spec.namespaces().to_vec(),
            records,
        })
    }
}
