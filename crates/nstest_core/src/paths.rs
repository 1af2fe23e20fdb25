//! Slash-delimited path helpers used by namespace resolution.
//!
//! ## Notes
//! - Candidate paths are normalized when built: empty segments (leading, trailing or doubled separators) and `.`
//!   segments are dropped. A leading separator is therefore never a split point for [`shrink_candidate`].

/// The only path separator these helpers understand.
pub const SEPARATOR: char = '/';

/// A path split into directory, file stem and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParts<'a> {
    /// Everything before the last separator (empty when there is none)
    pub dir: &'a str,
    /// File name without its extension
    pub stem: &'a str,
    /// Text after the last `.` of the file name, if any
    pub extension: Option<&'a str>,
}

/// Split a path into its directory, stem and extension.
///
/// ## Examples
/// ```rust
/// use nstest_core::split_path;
/// let parts = split_path("src/foo/bar.clj");
/// assert_eq!(parts.dir, "src/foo");
/// assert_eq!(parts.stem, "bar");
/// assert_eq!(parts.extension, Some("clj"));
/// ```
pub fn split_path(path: &str) -> PathParts<'_> {
    let (dir, file_name) = match path.rsplit_once(SEPARATOR) {
        Some((dir, file_name)) => (dir, file_name),
        None => ("", path),
    };
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file_name, None),
    };
    PathParts { dir, stem, extension }
}

/// Return the extension of the final path component.
pub fn extension_of(path: &str) -> Option<&str> {
    split_path(path).extension
}

/// Return `path` without the extension of its final component.
pub fn strip_extension(path: &str) -> &str {
    match extension_of(path) {
        // The extension is a suffix of `path`, preceded by a single `.`.
        Some(ext) => &path[..path.len() - ext.len() - 1],
        None => path,
    }
}

/// Check whether `path` carries one of the given extensions.
///
/// ## Parameters
/// - `path`: the path to classify.
/// - `extensions`: extensions without a leading dot (e.g. `"clj"`).
///
/// ## Returns
/// - `bool`: `true` when the extension matches exactly (case-sensitive).
pub fn is_supported_extension<S: AsRef<str>>(path: &str, extensions: &[S]) -> bool {
    match extension_of(path) {
        Some(ext) => extensions.iter().any(|candidate| candidate.as_ref() == ext),
        None => false,
    }
}

/// Build the conventional test-file candidate for a source path.
///
/// The candidate is `{dir}/{prefix}{stem}{suffix}.{ext}` with empty and `.` directory segments removed.
///
/// ## Examples
/// ```rust
/// use nstest_core::test_candidate;
/// assert_eq!(test_candidate("src/foo/bar.clj", "test_", ""), "src/foo/test_bar.clj");
/// assert_eq!(test_candidate("bar.clj", "", "_test"), "bar_test.clj");
/// assert_eq!(test_candidate("/src//foo/bar.clj", "test_", ""), "src/foo/test_bar.clj");
/// ```
pub fn test_candidate(source_path: &str, prefix: &str, suffix: &str) -> String {
    let parts = split_path(source_path);

    let mut candidate = String::with_capacity(source_path.len() + prefix.len() + suffix.len());
    for segment in parts.dir.split(SEPARATOR).filter(|s| !s.is_empty() && *s != ".") {
        candidate.push_str(segment);
        candidate.push(SEPARATOR);
    }
    candidate.push_str(prefix);
    candidate.push_str(parts.stem);
    candidate.push_str(suffix);
    if let Some(ext) = parts.extension {
        candidate.push('.');
        candidate.push_str(ext);
    }
    candidate
}

/// Drop the leading directory segment of a candidate path.
///
/// ## Returns
/// - (`Option<&str>`): the shorter candidate, or `None` once no separator is left.
pub fn shrink_candidate(candidate: &str) -> Option<&str> {
    candidate.split_once(SEPARATOR).map(|(_, rest)| rest)
}
