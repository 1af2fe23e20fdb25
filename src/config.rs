//! Engine configuration
//!
//! Defaults follow Leiningen/Midje conventions: tests under `test/`, Clojure source extensions,
//! `test_` file prefix and JUnit reports under `target/surefire-reports`.

use std::path::{Path, PathBuf};

/// Runner directives written to the ephemeral config artifact: JUnit emitter, no colors.
pub const DEFAULT_RUNNER_CONFIG: &str = "(change-defaults
  :emitter 'midje.emission.plugins.junit
  :colorize false)
";

/// Immutable configuration shared by the resolver, the test-set builder and the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory all relative paths (roots, reports, changed files) are resolved against
    pub project_root: PathBuf,
    /// Candidate test root directories, searched in order
    pub test_roots: Vec<String>,
    /// Recognized source extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Prepended to a source file stem to name its test file
    pub test_prefix: String,
    /// Appended to a source file stem to name its test file
    pub test_suffix: String,
    /// Runner program followed by its fixed leading arguments
    pub runner: Vec<String>,
    /// Directory holding `TEST-{namespace}.xml` reports, relative to the project root
    pub report_dir: PathBuf,
    /// Contents of the ephemeral runner config artifact
    pub runner_config: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            test_roots: vec!["test".to_string()],
            extensions: vec!["clj".to_string(), "cljs".to_string(), "cljc".to_string()],
            test_prefix: "test_".to_string(),
            test_suffix: String::new(),
            runner: vec!["lein".to_string(), "midje".to_string()],
            report_dir: PathBuf::from("target/surefire-reports"),
            runner_config: DEFAULT_RUNNER_CONFIG.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project root
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Replace the test roots
    pub fn with_test_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the supported extensions. A leading `.` is tolerated and removed.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext: String = ext.into();
                ext.trim_start_matches('.').to_string()
            })
            .collect();
        self
    }

    /// Set the test file prefix
    pub fn with_test_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.test_prefix = prefix.into();
        self
    }

    /// Set the test file suffix
    pub fn with_test_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.test_suffix = suffix.into();
        self
    }

    /// Replace the runner command line prefix
    pub fn with_runner<I, S>(mut self, runner: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner = runner.into_iter().map(Into::into).collect();
        self
    }

    /// Set the report directory
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Set the runner config artifact contents
    pub fn with_runner_config(mut self, contents: impl Into<String>) -> Self {
        self.runner_config = contents.into();
        self
    }

    /// Resolve a project-relative path against the project root.
    pub fn project_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Location of the structured report for `namespace`.
    pub fn report_path(&self, namespace: &str) -> PathBuf {
        self.project_path(&self.report_dir).join(format!("TEST-{namespace}.xml"))
    }
}
