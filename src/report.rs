//! Structured report parsing and aggregation.
//!
//! The runner writes one xUnit/JUnit XML file per namespace. This module turns those files into
//! [`TestResultRecord`]s and merges them in namespace order.
//!
//! ## Status mapping
//!
//! - `<failure>` -> [`TestStatus::Failed`]
//! - `<error>` -> [`TestStatus::Errored`]
//! - `<skipped>` -> [`TestStatus::Skipped`]
//! - none of the above -> [`TestStatus::Passed`]

use std::fs;
use std::time::Duration;

use nstest_core::TestStatus;
use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult, ReportError};

/// A single normalized test result.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResultRecord {
    namespace: String,
    name: String,
    status: TestStatus,
    message: Option<String>,
    duration: Option<Duration>,
}

impl TestResultRecord {
    /// Namespace whose report produced this record
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Test name, qualified by its class name when the report provides one
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Errors from the xUnit parser.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("root element is not <testsuites>, <testsuite> or <testcase>")]
    NotXunit,

    #[error("document ends with {open} element(s) still open")]
    Truncated { open: usize },
}

/// A `<testcase>` being assembled while its children are read.
struct CaseBuilder {
    name: String,
    status: TestStatus,
    message: Option<String>,
    duration: Option<Duration>,
}

impl CaseBuilder {
    fn from_element(element: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = attribute(element, b"name")?.unwrap_or_default();
        let name = match attribute(element, b"classname")? {
            Some(class) if !class.is_empty() => format!("{class}.{name}"),
            _ => name,
        };
        let duration = attribute(element, b"time")?
            .and_then(|t| t.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

        Ok(Self {
            name,
            status: TestStatus::Passed,
            message: None,
            duration,
        })
    }

    /// Apply a `<failure>`/`<error>`/`<skipped>` child. A skip never masks a failure or error.
    fn mark(&mut self, status: TestStatus, message: Option<String>) {
        if self.status == TestStatus::Passed || (self.status == TestStatus::Skipped && status.is_unsuccessful()) {
            self.status = status;
        }
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.push_message(&message);
        }
    }

    fn push_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut self.message {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => self.message = Some(text.to_string()),
        }
    }

    fn finish(self, namespace: &str) -> TestResultRecord {
        TestResultRecord {
            namespace: namespace.to_string(),
            name: self.name,
            status: self.status,
            message: self.message,
            duration: self.duration,
        }
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, ParseError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn outcome_status(tag: &[u8]) -> Option<TestStatus> {
    match tag {
        b"failure" => Some(TestStatus::Failed),
        b"error" => Some(TestStatus::Errored),
        b"skipped" => Some(TestStatus::Skipped),
        _ => None,
    }
}

fn is_xunit_root(tag: &[u8]) -> bool {
    matches!(tag, b"testsuites" | b"testsuite" | b"testcase")
}

/// Parse an xUnit/JUnit XML document into records attributed to `namespace`.
///
/// The root element must be `<testsuites>`, `<testsuite>` or `<testcase>`. `<testcase>` elements are collected
/// in document order at any nesting depth. A document that ends with elements still open is rejected.
pub fn parse_xunit(xml: &str, namespace: &str) -> Result<Vec<TestResultRecord>, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut saw_root = false;
    let mut depth = 0usize;
    let mut current: Option<CaseBuilder> = None;
    // Set while inside a <failure>/<error>/<skipped> body.
    let mut capturing = false;

    loop {
        let event = reader.read_event()?;
        if let Event::Start(element) | Event::Empty(element) = &event {
            if depth == 0 && !saw_root {
                if !is_xunit_root(element.name().as_ref()) {
                    return Err(ParseError::NotXunit);
                }
                saw_root = true;
            }
        }

        match event {
            Event::Start(element) => {
                depth += 1;
                match element.name().as_ref() {
                    b"testcase" => current = Some(CaseBuilder::from_element(&element)?),
                    tag => {
                        if let (Some(status), Some(case)) = (outcome_status(tag), current.as_mut()) {
                            case.mark(status, attribute(&element, b"message")?);
                            capturing = true;
                        }
                    }
                }
            }
            Event::Empty(element) => match element.name().as_ref() {
                b"testcase" => records.push(CaseBuilder::from_element(&element)?.finish(namespace)),
                tag => {
                    if let (Some(status), Some(case)) = (outcome_status(tag), current.as_mut()) {
                        case.mark(status, attribute(&element, b"message")?);
                    }
                }
            },
            Event::Text(text) => {
                if let (true, Some(case)) = (capturing, current.as_mut()) {
                    case.push_message(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let (true, Some(case)) = (capturing, current.as_mut()) {
                    case.push_message(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(element) => {
                depth = depth.saturating_sub(1);
                match element.name().as_ref() {
                    b"testcase" => {
                        if let Some(case) = current.take() {
                            records.push(case.finish(namespace));
                        }
                        capturing = false;
                    }
                    tag if outcome_status(tag).is_some() => capturing = false,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(ParseError::Truncated { open: depth });
    }
    if !saw_root {
        return Err(ParseError::NotXunit);
    }
    Ok(records)
}

/// Merged results of reading every requested namespace's report.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub records: Vec<TestResultRecord>,
    pub failures: Vec<ReportError>,
}

impl Aggregation {
    /// Succeed only when every namespace produced a readable report.
    pub fn into_result(self) -> EngineResult<Vec<TestResultRecord>> {
        if self.failures.is_empty() {
            Ok(self.records)
        } else {
            Err(EngineError::IncompleteReports {
                failures: self.failures,
                partial: self.records,
            })
        }
    }
}

/// Read and parse one namespace's report.
pub fn read_report(config: &EngineConfig, namespace: &str) -> Result<Vec<TestResultRecord>, ReportError> {
    let path = config.report_path(namespace);
    let xml = match fs::read_to_string(&path) {
        Ok(xml) => xml,
        Err(source) => {
            return Err(ReportError::Missing {
                namespace: namespace.to_string(),
                path,
                source,
            });
        }
    };
    parse_xunit(&xml, namespace).map_err(|source| ReportError::Parse {
        namespace: namespace.to_string(),
        path,
        source,
    })
}

/// Read every namespace's report, concatenating records in namespace order.
///
/// A report failure is recorded against its namespace without discarding the others.
#[tracing::instrument(skip_all, fields(namespace_count = namespaces.len()))]
pub fn aggregate(config: &EngineConfig, namespaces: &[String]) -> Aggregation {
    let mut aggregation = Aggregation::default();
    for namespace in namespaces {
        match read_report(config, namespace) {
            Ok(records) => {
                tracing::debug!(%namespace, count = records.len(), "parsed report");
                aggregation.records.extend(records);
            }
            Err(err) => {
                tracing::warn!(%namespace, error = %err, "report unavailable");
                aggregation.failures.push(err);
            }
        }
    }
    aggregation
}
