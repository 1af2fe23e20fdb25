//! Result reporting
//!
//! ## TestReporter Trait
//!
//! Reporting is separated from the engine by the `TestReporter` trait, so output formats (console,
//! JSON) can be swapped without touching selection or aggregation. Reporters write to any `io::Write`.

use std::io::{self, Write};
use std::time::Duration;

use nstest_core::TestStatus;
use serde::Serialize;

use crate::report::TestResultRecord;

/// Trait for reporting aggregated test results.
pub trait TestReporter {
    /// Called once with the namespaces handed to the runner
    fn on_run_start(&mut self, _namespaces: &[String]) -> io::Result<()> {
        Ok(())
    }

    /// Called for each record, in report order
    fn on_record(&mut self, record: &TestResultRecord) -> io::Result<()>;

    /// Called after the last record
    fn on_run_complete(&mut self, summary: &TestSummary) -> io::Result<()>;
}

/// Counts per status for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl TestSummary {
    pub fn from_records(records: &[TestResultRecord], duration: Duration) -> Self {
        let mut summary = TestSummary {
            total: records.len(),
            duration,
            ..TestSummary::default()
        };
        for record in records {
            match record.status() {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Errored => summary.errored += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Feed every record through a reporter.
pub fn report_all(
    reporter: &mut dyn TestReporter,
    namespaces: &[String],
    records: &[TestResultRecord],
    duration: Duration,
) -> io::Result<TestSummary> {
    reporter.on_run_start(namespaces)?;
    for record in records {
        reporter.on_record(record)?;
    }
    let summary = TestSummary::from_records(records, duration);
    reporter.on_run_complete(&summary)?;
    Ok(summary)
}

/// Console reporter (one line per test, then a summary line)
pub struct ConsoleReporter<W: Write> {
    out: W,
    pub verbose: bool,
    pub color: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool, color: bool) -> Self {
        Self { out, verbose, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, namespaces: &[String]) -> io::Result<()> {
        if self.verbose {
            writeln!(self.out, "ran {} namespace(s): {}", namespaces.len(), namespaces.join(" "))?;
        }
        Ok(())
    }

    fn on_record(&mut self, record: &TestResultRecord) -> io::Result<()> {
        let status = match record.status() {
            TestStatus::Passed => self.paint("32", "PASSED"),
            TestStatus::Failed => self.paint("31", "FAILED"),
            TestStatus::Errored => self.paint("31", "ERROR"),
            TestStatus::Skipped => self.paint("33", "SKIPPED"),
        };

        // Passing tests are only listed in verbose mode
        if record.status() == TestStatus::Passed && !self.verbose {
            return Ok(());
        }

        match record.duration() {
            Some(d) if self.verbose => writeln!(self.out, "{} {} ({}ms)", record.name(), status, d.as_millis())?,
            _ => writeln!(self.out, "{} {}", record.name(), status)?,
        }
        if let Some(message) = record.message().filter(|_| record.status().is_unsuccessful()) {
            for line in message.lines() {
                writeln!(self.out, "    {line}")?;
            }
        }
        Ok(())
    }

    fn on_run_complete(&mut self, summary: &TestSummary) -> io::Result<()> {
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(self.paint("32", &format!("{} passed", summary.passed)));
        }
        if summary.failed > 0 {
            parts.push(self.paint("31", &format!("{} failed", summary.failed)));
        }
        if summary.errored > 0 {
            parts.push(self.paint("31", &format!("{} errored", summary.errored)));
        }
        if summary.skipped > 0 {
            parts.push(self.paint("33", &format!("{} skipped", summary.skipped)));
        }
        if parts.is_empty() {
            parts.push("no results".to_string());
        }

        writeln!(
            self.out,
            "====== {} in {:.2}s ======",
            parts.join(", "),
            summary.duration.as_secs_f64()
        )
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    namespace: &'a str,
    name: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> From<&'a TestResultRecord> for JsonRecord<'a> {
    fn from(record: &'a TestResultRecord) -> Self {
        Self {
            namespace: record.namespace(),
            name: record.name(),
            status: record.status().as_str(),
            message: record.message(),
            duration_secs: record.duration().map(|d| d.as_secs_f64()),
        }
    }
}

/// JSON reporter: a single array of records, written when the run completes.
pub struct JsonReporter<W: Write> {
    out: W,
    buffered: Vec<TestResultRecord>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffered: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_record(&mut self, record: &TestResultRecord) -> io::Result<()> {
        self.buffered.push(record.clone());
        Ok(())
    }

    fn on_run_complete(&mut self, _summary: &TestSummary) -> io::Result<()> {
        let records: Vec<JsonRecord<'_>> = self.buffered.iter().map(JsonRecord::from).collect();
        serde_json::to_writer_pretty(&mut self.out, &records)?;
        writeln!(self.out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::report::parse_xunit;

    fn sample_records() -> Vec<TestResultRecord> {
        parse_xunit(
            r#"<testsuite name="foo.test-bar">
                 <testcase classname="foo.test-bar" name="adds" time="0.25"/>
                 <testcase classname="foo.test-bar" name="subtracts"><failure message="expected 1">actual: 2</failure></testcase>
                 <testcase classname="foo.test-bar" name="pending"><skipped/></testcase>
               </testsuite>"#,
            "foo.test-bar",
        )
        .unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let summary = TestSummary::from_records(&sample_records(), Duration::ZERO);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_verbose_header_counts_namespaces_without_results() {
        let records = sample_records();
        let namespaces = ["empty-test".to_string(), "foo.test-bar".to_string()];
        let mut reporter = ConsoleReporter::new(Vec::new(), true, false);
        report_all(&mut reporter, &namespaces, &records, Duration::ZERO).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out.lines().next(), Some("ran 2 namespace(s): empty-test foo.test-bar"));
        assert!(out.contains("foo.test-bar.adds PASSED (250ms)"));
    }

    #[test]
    fn test_console_output_without_color() {
        let records = sample_records();
        let mut reporter = ConsoleReporter::new(Vec::new(), false, false);
        report_all(&mut reporter, &["foo.test-bar".to_string()], &records, Duration::from_millis(1500)).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        insta::assert_snapshot!(out, @r"
        foo.test-bar.subtracts FAILED
            expected 1
            actual: 2
        foo.test-bar.pending SKIPPED
        ====== 1 passed, 1 failed, 1 skipped in 1.50s ======
        ");
    }

    #[test]
    fn test_json_output() {
        let records = sample_records();
        let mut reporter = JsonReporter::new(Vec::new());
        report_all(&mut reporter, &[], &records[..2], Duration::ZERO).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        insta::assert_snapshot!(out, @r#"
        [
          {
            "namespace": "foo.test-bar",
            "name": "foo.test-bar.adds",
            "status": "passed",
            "duration_secs": 0.25
          },
          {
            "namespace": "foo.test-bar",
            "name": "foo.test-bar.subtracts",
            "status": "failed",
            "message": "expected 1\nactual: 2"
          }
        ]
        "#);
    }
}
