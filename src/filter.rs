// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stack-trace noise filtering.

// With thanks to org.apache.tools.ant.taskdefs.optional.junit.JUnitTestRunner.
static DEFAULT_TRACE_FILTERS: &[&str] = &[
    "junit.framework.TestCase",
    "junit.framework.TestResult",
    "junit.framework.TestSuite",
    "junit.framework.Assert.", // don't filter AssertionFailure
    "java.lang.reflect.Method.invoke(",
    "sun.reflect.",
    // JUnit 4 support:
    "org.junit.",
    "junit.framework.JUnit4TestAdapter",
    " more",
    "android.test.",
    "android.app.Instrumentation",
    "java.lang.reflect.Method.invokeNative",
];

/// Suppresses known framework-noise lines from stack traces.
///
/// A line is dropped iff it contains one of the configured substrings. All
/// other lines pass through unchanged, in their original order. The filter
/// operates on trace text only; error type and message fields are never
/// touched.
#[derive(Clone, Debug)]
pub struct TraceFilter {
    needles: Vec<String>,
}

impl TraceFilter {
    /// Creates a filter from custom noise substrings.
    pub fn new(needles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            needles: needles.into_iter().map(Into::into).collect(),
        }
    }

    /// Filters a multi-line trace, dropping noise lines.
    ///
    /// Every kept line is newline-terminated in the output.
    pub fn filter(&self, trace: &str) -> String {
        let mut out = String::with_capacity(trace.len());
        for line in trace.lines() {
            if self.needles.iter().any(|needle| line.contains(needle)) {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl Default for TraceFilter {
    /// The default noise set: JUnit internals, reflection trampolines, the
    /// JUnit 4 adapter, and Android instrumentation frames.
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_FILTERS.iter().copied())
    }
}
