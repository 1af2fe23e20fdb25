//! Source path to test namespace resolution.
//!
//! Without a project manifest the resolver guesses where a source file's test lives: it builds the
//! conventional test file name (`{prefix}{stem}{suffix}.{ext}`) next to the source directory and probes
//! every test root for it. Source trees often carry extra leading directories that the mirrored test tree
//! does not (`src/foo/bar.clj` vs `test/foo/test_bar.clj`), so after each miss the leading directory is
//! dropped and the roots are probed again, until only the file name is left.

use std::fs;
use std::path::Path;

use nstest_core::{path_to_namespace, shrink_candidate, test_candidate};

use crate::config::EngineConfig;

/// Filesystem seam for probing candidate test files.
pub trait FileProbe {
    /// Whether `path` is an existing, readable file.
    fn is_readable(&self, path: &Path) -> bool;
}

/// Probe the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_readable(&self, path: &Path) -> bool {
        path.is_file() && fs::File::open(path).is_ok()
    }
}

/// One `(test root, root-relative candidate)` pair to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeCandidate<'a> {
    pub root: &'a str,
    pub relative: &'a str,
}

/// Iterate probe candidates: every root for the full candidate, then every root for the candidate
/// without its leading directory, and so on until no separator is left.
#[derive(Debug, Clone)]
pub struct ProbeCandidates<'a> {
    roots: &'a [String],
    current: Option<&'a str>,
    next_root: usize,
}

impl<'a> ProbeCandidates<'a> {
    pub fn new(roots: &'a [String], candidate: &'a str) -> Self {
        Self {
            roots,
            current: Some(candidate),
            next_root: 0,
        }
    }
}

impl<'a> Iterator for ProbeCandidates<'a> {
    type Item = ProbeCandidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let relative = self.current?;
            if let Some(root) = self.roots.get(self.next_root) {
                self.next_root += 1;
                return Some(ProbeCandidate { root, relative });
            }
            self.current = shrink_candidate(relative);
            self.next_root = 0;
        }
    }
}

/// Maps paths to namespaces under one [`EngineConfig`].
pub struct NamespaceResolver<'a, P: FileProbe = FsProbe> {
    config: &'a EngineConfig,
    probe: P,
}

impl<'a> NamespaceResolver<'a, FsProbe> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self::with_probe(config, FsProbe)
    }
}

impl<'a, P: FileProbe> NamespaceResolver<'a, P> {
    pub fn with_probe(config: &'a EngineConfig, probe: P) -> Self {
        Self { config, probe }
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Convert a root-relative file path into its namespace.
    pub fn path_to_namespace(&self, path: &str) -> String {
        path_to_namespace(path)
    }

    /// Find the namespace of the test covering `source_path`, if a matching test file exists.
    pub fn path_to_test_namespace(&self, source_path: &str) -> Option<String> {
        let candidate = test_candidate(source_path, &self.config.test_prefix, &self.config.test_suffix);

        let found = ProbeCandidates::new(&self.config.test_roots, &candidate).find(|pair| {
            let path = self.config.project_path(pair.root).join(pair.relative);
            self.probe.is_readable(&path)
        })?;

        tracing::debug!(source = source_path, root = found.root, test = found.relative, "resolved test file");
        Some(path_to_namespace(found.relative))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;

    use super::*;

    /// In-memory probe that records every path it was asked about.
    #[derive(Default)]
    struct FakeProbe {
        files: HashSet<PathBuf>,
        probed: RefCell<Vec<PathBuf>>,
    }

    impl FakeProbe {
        fn with_files(files: &[&str]) -> Self {
            Self {
                files: files.iter().map(PathBuf::from).collect(),
                probed: RefCell::default(),
            }
        }
    }

    impl FileProbe for &FakeProbe {
        fn is_readable(&self, path: &Path) -> bool {
            self.probed.borrow_mut().push(path.to_path_buf());
            self.files.contains(path)
        }
    }

    fn config(roots: &[&str]) -> EngineConfig {
        EngineConfig::new().with_project_root("").with_test_roots(roots.iter().copied())
    }

    #[test]
    fn test_probe_order_walks_roots_then_shrinks() {
        let roots = vec!["test".to_string(), "spec".to_string()];
        let pairs: Vec<_> = ProbeCandidates::new(&roots, "src/foo/test_bar.clj")
            .map(|c| format!("{}/{}", c.root, c.relative))
            .collect();
        assert_eq!(
            pairs,
            [
                "test/src/foo/test_bar.clj",
                "spec/src/foo/test_bar.clj",
                "test/foo/test_bar.clj",
                "spec/foo/test_bar.clj",
                "test/test_bar.clj",
                "spec/test_bar.clj",
            ]
        );
    }

    #[test]
    fn test_no_roots_yields_nothing() {
        assert_eq!(ProbeCandidates::new(&[], "src/foo/test_bar.clj").count(), 0);
    }

    #[test]
    fn test_resolves_after_dropping_source_directory() {
        let config = config(&["test"]);
        let probe = FakeProbe::with_files(&["test/foo/test_bar.clj"]);
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(resolver.path_to_test_namespace("src/foo/bar.clj").as_deref(), Some("foo.test-bar"));
    }

    #[test]
    fn test_first_match_wins() {
        let config = config(&["test"]);
        let probe = FakeProbe::with_files(&["test/src/foo/test_bar.clj", "test/foo/test_bar.clj"]);
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(
            resolver.path_to_test_namespace("src/foo/bar.clj").as_deref(),
            Some("src.foo.test-bar")
        );
    }

    #[test]
    fn test_later_root_is_searched() {
        let config = config(&["test", "spec"]);
        let probe = FakeProbe::with_files(&["spec/foo/test_bar.clj"]);
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(resolver.path_to_test_namespace("src/foo/bar.clj").as_deref(), Some("foo.test-bar"));
    }

    #[test]
    fn test_unresolvable_returns_none_after_exhausting_candidates() {
        let config = config(&["test"]);
        let probe = FakeProbe::default();
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(resolver.path_to_test_namespace("src/foo/bar.clj"), None);
        assert_eq!(probe.probed.borrow().len(), 3);
    }

    #[test]
    fn test_leading_separator_is_not_a_split_point() {
        let config = config(&["test"]);
        let probe = FakeProbe::with_files(&["test/foo/test_bar.clj"]);
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(resolver.path_to_test_namespace("/src/foo/bar.clj").as_deref(), Some("foo.test-bar"));
    }

    #[test]
    fn test_file_without_directory() {
        let config = config(&["test"]);
        let probe = FakeProbe::with_files(&["test/test_core.clj"]);
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(resolver.path_to_test_namespace("core.clj").as_deref(), Some("test-core"));
    }

    #[test]
    fn test_suffix_convention() {
        let config = config(&["test"]).with_test_prefix("").with_test_suffix("_test");
        let probe = FakeProbe::with_files(&["test/my_app/core_test.clj"]);
        let resolver = NamespaceResolver::with_probe(&config, &probe);
        assert_eq!(
            resolver.path_to_test_namespace("src/my_app/core.clj").as_deref(),
            Some("my-app.core-test")
        );
    }
}
