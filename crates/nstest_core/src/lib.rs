//! Provide pure path and namespace helpers for the `nstest` selector and runner driver.
//!
//! Everything in this crate is deterministic string manipulation over slash-delimited relative paths:
//! - converting a file path into a dotted namespace identifier,
//! - building the conventional test-file candidate for a source file and shrinking it one directory at a time,
//! - classifying paths by extension.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state. Filesystem probing lives in the `nstest` crate
//!   behind a trait so this logic can be tested without touching disk.
//! - Paths are treated as `/`-separated strings regardless of platform; callers hand in repository-relative paths.

pub mod paths;
pub mod status;

pub use paths::{
    PathParts, SEPARATOR, extension_of, is_supported_extension, shrink_candidate, split_path, strip_extension,
    test_candidate,
};
pub use status::TestStatus;

/// Convert a file path into its dotted namespace identifier.
///
/// ## Parameters
/// - `path`: slash-delimited relative path, usually with an extension.
///
/// ## Returns
/// - (`String`): the path with its extension removed, every `_` replaced by `-` and every `/` replaced by `.`.
///
/// ## Notes
/// - Only the extension of the final path component is removed; dots in directory names are kept.
/// - The mapping is one-directional: `foo_bar` and `foo-bar` both map to `foo-bar`.
///
/// ## Examples
/// ```rust
/// use nstest_core::path_to_namespace;
/// assert_eq!(path_to_namespace("test/foo_bar/baz.clj"), "test.foo-bar.baz");
/// assert_eq!(path_to_namespace("a_test.clj"), "a-test");
/// ```
pub fn path_to_namespace(path: &str) -> String {
    strip_extension(path)
        .chars()
        .map(|ch| match ch {
            '_' => '-',
            SEPARATOR => '.',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_from_nested_path() {
        assert_eq!(path_to_namespace("test/foo_bar/baz.clj"), "test.foo-bar.baz");
    }

    #[test]
    fn test_namespace_without_directory() {
        assert_eq!(path_to_namespace("a_test.clj"), "a-test");
    }

    #[test]
    fn test_namespace_keeps_dotted_directories() {
        assert_eq!(path_to_namespace("v1.2/core_test.cljc"), "v1.2.core-test");
    }

    #[test]
    fn test_namespace_without_extension() {
        assert_eq!(path_to_namespace("foo/bar_baz"), "foo.bar-baz");
    }

    #[test]
    fn test_namespace_strips_only_last_extension() {
        assert_eq!(path_to_namespace("foo/bar.spec.clj"), "foo.bar.spec");
    }
}
