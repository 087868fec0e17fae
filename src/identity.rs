// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test identity as seen by the host test driver.

/// Identity of a test occurrence, as supplied by the host test driver.
///
/// A test is grouped under a *suite* (the name of its declaring type) and
/// identified within that suite by its *test name*. Both names must be
/// non-empty. The identity is otherwise opaque to this crate.
pub trait TestIdentity {
    /// The name of the suite (declaring type) this test belongs to.
    fn suite_name(&self) -> &str;

    /// The name of the test within its suite.
    fn test_name(&self) -> &str;
}

/// A plain test case: suite name plus declared test name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestId {
    suite: String,
    name: String,
}

impl TestId {
    /// Creates a new `TestId`.
    pub fn new(suite: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            name: name.into(),
        }
    }
}

impl TestIdentity for TestId {
    fn suite_name(&self) -> &str {
        &self.suite
    }

    fn test_name(&self) -> &str {
        &self.name
    }
}

/// A data-driven test case that supplies its own display name.
///
/// The declared name stays available through [`declared_name`], but the
/// custom name is what identifies the occurrence in the report.
///
/// [`declared_name`]: DataDrivenTestId::declared_name
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataDrivenTestId {
    suite: String,
    declared_name: String,
    custom_name: String,
}

impl DataDrivenTestId {
    /// Creates a new `DataDrivenTestId`.
    pub fn new(
        suite: impl Into<String>,
        declared_name: impl Into<String>,
        custom_name: impl Into<String>,
    ) -> Self {
        Self {
            suite: suite.into(),
            declared_name: declared_name.into(),
            custom_name: custom_name.into(),
        }
    }

    /// The name the test was declared with, before customization.
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }
}

impl TestIdentity for DataDrivenTestId {
    fn suite_name(&self) -> &str {
        &self.suite
    }

    fn test_name(&self) -> &str {
        &self.custom_name
    }
}
