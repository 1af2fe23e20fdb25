//! Canonical test status vocabulary.

use std::fmt;

/// Outcome of a single test case as recorded in a structured report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Passed,
    Failed,
    /// The test could not complete (an error outside its assertions)
    Errored,
    Skipped,
}

impl TestStatus {
    /// Every status, in reporting order.
    pub const ALL: [TestStatus; 4] = [TestStatus::Passed, TestStatus::Failed, TestStatus::Errored, TestStatus::Skipped];

    /// Return the lowercase name used in summaries and machine-readable output.
    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Errored => "errored",
            TestStatus::Skipped => "skipped",
        }
    }

    /// Whether this status should make the overall run unsuccessful.
    pub fn is_unsuccessful(self) -> bool {
        matches!(self, TestStatus::Failed | TestStatus::Errored)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsuccessful_statuses() {
        let bad: Vec<_> = TestStatus::ALL.into_iter().filter(|s| s.is_unsuccessful()).collect();
        assert_eq!(bad, [TestStatus::Failed, TestStatus::Errored]);
    }

    #[test]
    fn test_display_matches_as_str() {
        for status in TestStatus::ALL {
            assert_eq!(status.to_string(), status.as_str());
        }
    }
}
