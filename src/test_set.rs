//! Test set selection.
//!
//! Two modes produce the namespaces to hand to the runner:
//! - **run all**: every supported file under every test root,
//! - **changed paths**: the test namespace resolved for each changed source file.
//!
//! An empty selection is not an error here; the engine turns it into a "no tests to run" outcome.

use std::collections::HashSet;
use std::path::Path;

use nstest_core::{is_supported_extension, path_to_namespace};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{EngineError, EngineResult};
use crate::resolver::{FileProbe, FsProbe, NamespaceResolver};

/// Builds the namespace list for a run.
pub struct TestSetBuilder<'a, P: FileProbe = FsProbe> {
    resolver: NamespaceResolver<'a, P>,
}

impl<'a, P: FileProbe> TestSetBuilder<'a, P> {
    pub fn new(resolver: NamespaceResolver<'a, P>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &NamespaceResolver<'a, P> {
        &self.resolver
    }

    /// Enumerate every supported file under every test root.
    ///
    /// Files are deduplicated by root-relative path, so the same layout mirrored in two roots is run once.
    /// Order is discovery order: roots in configured order, entries sorted by name within a directory.
    /// Test roots that do not exist are skipped.
    #[tracing::instrument(skip_all)]
    pub fn build_all(&self) -> EngineResult<Vec<String>> {
        let config = self.resolver.config();
        let mut seen: HashSet<String> = HashSet::new();
        let mut namespaces = Vec::new();

        for root in &config.test_roots {
            let root_dir = config.project_path(root);
            if !root_dir.is_dir() {
                tracing::debug!(root = %root_dir.display(), "test root does not exist");
                continue;
            }

            let walker = WalkDir::new(&root_dir)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

            for entry in walker {
                let entry = entry.map_err(|source| EngineError::Discovery {
                    root: root_dir.clone(),
                    source,
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(&root_dir) else {
                    continue;
                };
                let relative = to_slash_path(relative);
                if !is_supported_extension(&relative, &config.extensions) {
                    continue;
                }
                if seen.insert(relative.clone()) {
                    namespaces.push(path_to_namespace(&relative));
                }
            }
        }

        tracing::info!(count = namespaces.len(), "collected test namespaces");
        Ok(namespaces)
    }

    /// Resolve the test namespace for each changed path.
    ///
    /// Unsupported file types are ignored, as are sources with no matching test file. A namespace is
    /// emitted once per source path that resolves to it.
    #[tracing::instrument(skip_all, fields(path_count = paths.len()))]
    pub fn build_for_changed_paths<S: AsRef<str>>(&self, paths: &[S]) -> Vec<String> {
        let extensions = &self.resolver.config().extensions;
        let mut namespaces = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if !is_supported_extension(path, extensions) {
                tracing::debug!(path, "skipping unsupported file type");
                continue;
            }
            match self.resolver.path_to_test_namespace(path) {
                Some(namespace) => namespaces.push(namespace),
                None => tracing::debug!(path, "no test found for source"),
            }
        }

        tracing::info!(count = namespaces.len(), "resolved test namespaces");
        namespaces
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::EngineConfig;

    struct NoFiles;

    impl FileProbe for NoFiles {
        fn is_readable(&self, _path: &Path) -> bool {
            false
        }
    }

    struct AllFiles;

    impl FileProbe for AllFiles {
        fn is_readable(&self, _path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn test_unsupported_extension_is_excluded() {
        let config = EngineConfig::new();
        let builder = TestSetBuilder::new(NamespaceResolver::with_probe(&config, AllFiles));
        assert!(builder.build_for_changed_paths(&["notes.txt", "README"]).is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let config = EngineConfig::new();
        let builder = TestSetBuilder::new(NamespaceResolver::with_probe(&config, AllFiles));
        let none: [&str; 0] = [];
        assert!(builder.build_for_changed_paths(&none).is_empty());
    }

    #[test]
    fn test_unresolvable_sources_are_excluded() {
        let config = EngineConfig::new();
        let builder = TestSetBuilder::new(NamespaceResolver::with_probe(&config, NoFiles));
        assert!(builder.build_for_changed_paths(&["src/foo/bar.clj"]).is_empty());
    }

    #[test]
    fn test_duplicates_are_emitted_per_source() {
        let config = EngineConfig::new();
        let builder = TestSetBuilder::new(NamespaceResolver::with_probe(&config, AllFiles));
        let namespaces = builder.build_for_changed_paths(&["src/bar.clj", "src/bar.clj", "bar.txt"]);
        assert_eq!(namespaces, ["src.test-bar", "src.test-bar"]);
    }

    #[test]
    fn test_to_slash_path() {
        let path: PathBuf = ["foo", "bar_baz", "a.clj"].iter().collect();
        assert_eq!(to_slash_path(&path), "foo/bar_baz/a.clj");
    }

    #[test]
    fn test_missing_root_contributes_nothing() {
        let config = EngineConfig::new().with_project_root("/nonexistent/nstest/project");
        let builder = TestSetBuilder::new(NamespaceResolver::new(&config));
        assert!(builder.build_all().unwrap().is_empty());
    }
}
