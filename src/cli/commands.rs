//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use miette::Report;

use crate::config::EngineConfig;
use crate::engine::{self, Engine, RunOutcome, Selection};
use crate::errors::EngineError;
use crate::resolver::NamespaceResolver;
use crate::runner::ProcessRunner;

use super::reporter::{ConsoleReporter, JsonReporter, TestReporter, report_all};
use super::{CliError, CliResult, ExitCode, OutputFormat, SelectionArgs};

/// Turn the selection arguments into a [`Selection`], reading stdin for `-`.
pub fn read_selection(args: &SelectionArgs) -> CliResult<Selection> {
    if args.all {
        return Ok(Selection::All);
    }

    let mut paths = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        if path == "-" {
            paths.extend(read_paths(io::stdin().lock())?);
        } else {
            paths.push(path.clone());
        }
    }
    Ok(Selection::Changed(paths))
}

/// Read newline-separated paths, ignoring blank lines.
pub fn read_paths(input: impl BufRead) -> CliResult<Vec<String>> {
    let mut paths = Vec::new();
    for line in input.lines() {
        let line = line.map_err(|e| CliError::error(format!("Error reading paths from stdin: {}", e)))?;
        let line = line.trim();
        if !line.is_empty() {
            paths.push(line.to_string());
        }
    }
    Ok(paths)
}

/// Render an engine error with its diagnostic code and help text.
fn engine_error(err: EngineError) -> CliError {
    CliError::error(format!("{:?}", Report::new(err)))
}

/// Run the selected tests and report the results.
pub fn run_tests(
    config: &EngineConfig,
    selection: &Selection,
    format: OutputFormat,
    verbose: bool,
    color: bool,
) -> CliResult<ExitCode> {
    let start = Instant::now();
    let runner = ProcessRunner::from_config(config).map_err(engine_error)?;
    let engine = Engine::new(config, runner);

    let (namespaces, records) = match engine.run(selection).map_err(engine_error)? {
        RunOutcome::NoTests => {
            eprintln!("No tests to run.");
            return Ok(ExitCode::SUCCESS);
        }
        RunOutcome::Completed { namespaces, records } => (namespaces, records),
    };

    let stdout = io::stdout().lock();
    let mut reporter: Box<dyn TestReporter> = match format {
        OutputFormat::Console => Box::new(ConsoleReporter::new(stdout, verbose, color)),
        OutputFormat::Json => Box::new(JsonReporter::new(stdout)),
    };
    let summary = report_all(reporter.as_mut(), &namespaces, &records, start.elapsed())
        .map_err(|e| CliError::error(format!("Error writing results: {}", e)))?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

/// Print the namespaces a run would execute, one per line.
pub fn print_selection(config: &EngineConfig, selection: &Selection) -> CliResult<ExitCode> {
    let namespaces = engine::select(config, selection).map_err(engine_error)?;

    if namespaces.is_empty() {
        eprintln!("No tests to run.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut out = io::stdout().lock();
    for namespace in &namespaces {
        writeln!(out, "{}", namespace).map_err(|e| CliError::error(format!("Error writing output: {}", e)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the test namespace covering `path`, failing when there is none.
pub fn resolve_path(config: &EngineConfig, path: &str) -> CliResult<ExitCode> {
    match NamespaceResolver::new(config).path_to_test_namespace(path) {
        Some(namespace) => {
            println!("{}", namespace);
            Ok(ExitCode::SUCCESS)
        }
        None => Err(CliError::failure(format!("No test found for '{}'", path))),
    }
}
