#![forbid(unsafe_code)]
//! nstest: run the test namespaces covering changed source files
//!
//! Given a list of changed files (or "run everything"), nstest works out which test namespaces cover
//! them by naming convention alone, hands that list to an external runner in a single invocation,
//! and reads the runner's per-namespace xUnit reports back into one ordered result list.
//!
//! ## Pipeline
//!
//! 1. [`test_set::TestSetBuilder`] selects namespaces, using [`resolver::NamespaceResolver`] for changed paths.
//! 2. [`runner::ProcessRunner`] runs `<runner> <namespaces...> :config <file>` once for the batch.
//! 3. [`report::aggregate`] parses `TEST-<namespace>.xml` for every requested namespace.
//!
//! [`engine::Engine`] ties the steps together; [`cli`] is the command-line front end.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod test_set;
pub mod version;

pub use config::EngineConfig;
pub use engine::{Engine, RunOutcome, Selection};
pub use errors::{EngineError, EngineResult, ReportError};
pub use nstest_core::{TestStatus, path_to_namespace};
pub use report::TestResultRecord;
pub use resolver::{FileProbe, FsProbe, NamespaceResolver};
pub use runner::{InvocationOutcome, ProcessRunner, RunSpec, Runner};
pub use test_set::TestSetBuilder;
