// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::SerializeError, registry::Status, serialize::serialize_report};
use std::io;

/// The root element of a TestNG report.
///
/// Timestamps throughout the model are wall-clock milliseconds; the
/// serializer derives the `duration-ms` (seconds, three decimals) and
/// `started-at`/`finished-at` attributes from them.
#[derive(Clone, Debug)]
pub struct Report {
    /// The name of this report, used for the umbrella suite/test pair.
    pub name: String,

    /// The number of test-start events observed.
    pub total: usize,

    /// The number of assertion-class failures.
    pub failed: usize,

    /// The number of error-class failures, rendered as `skipped`.
    pub skipped: usize,

    /// The earliest test start across all suites, in milliseconds.
    pub started_ms: i64,

    /// The latest test end across all suites, in milliseconds.
    pub finished_ms: i64,

    /// The class groupings contained in this report, one per suite.
    pub classes: Vec<TestClass>,
}

impl Report {
    /// Creates a new `Report` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0,
            failed: 0,
            skipped: 0,
            started_ms: 0,
            finished_ms: 0,
            classes: vec![],
        }
    }

    /// Sets the summary counts.
    pub fn set_counts(&mut self, total: usize, failed: usize, skipped: usize) -> &mut Self {
        self.total = total;
        self.failed = failed;
        self.skipped = skipped;
        self
    }

    /// Sets the overall timing window.
    pub fn set_window(&mut self, started_ms: i64, finished_ms: i64) -> &mut Self {
        self.started_ms = started_ms;
        self.finished_ms = finished_ms;
        self
    }

    /// Adds a class grouping to this report.
    pub fn add_class(&mut self, class: TestClass) -> &mut Self {
        self.classes.push(class);
        self
    }

    /// The number of passing tests: `total - failed - skipped`.
    ///
    /// Saturating, so a malformed event stream cannot panic report
    /// generation. `passed + failed + skipped == total` holds for every
    /// well-formed stream.
    pub fn passed(&self) -> usize {
        self.total.saturating_sub(self.failed + self.skipped)
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer)
    }

    /// Serialize this report to a string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        // The writer only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// One class grouping: the test methods observed for a single suite.
#[derive(Clone, Debug)]
pub struct TestClass {
    /// The suite name (declaring type name).
    pub name: String,

    /// The test methods in this class, in registry iteration order.
    pub test_methods: Vec<TestMethod>,
}

impl TestClass {
    /// Creates a new `TestClass`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            test_methods: vec![],
        }
    }

    /// Adds a test method to this class.
    pub fn add_test_method(&mut self, test_method: TestMethod) -> &mut Self {
        self.test_methods.push(test_method);
        self
    }
}

/// One test occurrence as rendered in the report.
#[derive(Clone, Debug)]
pub struct TestMethod {
    /// The test name. Emitted as both `name` and `signature`.
    pub name: String,

    /// The terminal status of the occurrence.
    pub status: Status,

    /// Start of the occurrence, in milliseconds.
    pub started_ms: i64,

    /// End of the occurrence, in milliseconds.
    pub finished_ms: i64,

    /// The failure detail block. Present iff `status != Pass`.
    pub exception: Option<Exception>,
}

impl TestMethod {
    /// Creates a new `TestMethod` with a zero-length timing window.
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
            started_ms: 0,
            finished_ms: 0,
            exception: None,
        }
    }

    /// Sets the timing window.
    pub fn set_window(&mut self, started_ms: i64, finished_ms: i64) -> &mut Self {
        self.started_ms = started_ms;
        self.finished_ms = finished_ms;
        self
    }

    /// Sets the failure detail block.
    pub fn set_exception(&mut self, exception: Exception) -> &mut Self {
        self.exception = Some(exception);
        self
    }
}

/// Captured failure detail for a non-passing test method.
#[derive(Clone, Debug)]
pub struct Exception {
    /// The type name of the underlying error.
    pub class_name: String,

    /// The error message, if one was supplied. The serializer substitutes a
    /// literal `<null>` placeholder when absent.
    pub message: Option<XmlString>,

    /// The stack trace rendered as text.
    pub stack_trace: XmlString,
}

impl Exception {
    /// Creates a new `Exception` with no message.
    pub fn new(class_name: impl Into<String>, stack_trace: impl Into<XmlString>) -> Self {
        Self {
            class_name: class_name.into(),
            message: None,
            stack_trace: stack_trace.into(),
        }
    }

    /// Sets the error message.
    pub fn set_message(&mut self, message: impl Into<XmlString>) -> &mut Self {
        self.message = Some(message.into());
        self
    }
}

/// Text destined for XML output.
///
/// Strips ANSI escapes and non-printable control characters on
/// construction. Tabs, newlines and carriage returns are preserved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct XmlString {
    inner: Box<str>,
}

impl XmlString {
    /// Creates a new `XmlString`, scrubbing the input.
    pub fn new(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        // The ANSI pass drops every C0 control except newline, so tabs and
        // carriage returns must be shielded from it. Stack traces commonly
        // indent frames with tabs.
        let keep: &[char] = &['\t', '\r'];
        let mut stripped = String::with_capacity(text.len());
        for chunk in text.split_inclusive(keep) {
            match chunk.strip_suffix(keep) {
                Some(body) => {
                    stripped.push_str(&strip_ansi_escapes::strip_str(body));
                    stripped.push_str(&chunk[body.len()..]);
                }
                None => stripped.push_str(&strip_ansi_escapes::strip_str(chunk)),
            }
        }
        let inner = stripped
            .replace(
                |c| matches!(c, '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f'),
                "",
            )
            .into_boxed_str();
        Self { inner }
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts the text into a `String`.
    pub fn into_string(self) -> String {
        self.inner.into_string()
    }
}

impl AsRef<str> for XmlString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for XmlString {
    fn from(text: &str) -> Self {
        XmlString::new(text)
    }
}

impl From<String> for XmlString {
    fn from(text: String) -> Self {
        XmlString::new(text)
    }
}

impl From<XmlString> for String {
    fn from(text: XmlString) -> Self {
        text.into_string()
    }
}
