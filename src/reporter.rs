// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::SerializeError,
    filter::TraceFilter,
    identity::TestIdentity,
    registry::{ProblemKind, ResultRegistry, TestFailure},
    report::Report,
};
use std::io;

/// Observes test lifecycle events and emits a TestNG report on close.
///
/// The reporter is a passive observer: the host driver calls
/// [`start_test`], optionally [`report_problem`] (at most once per
/// occurrence), then [`end_test`], strictly sequentially. Emission happens
/// exactly once, enforced by [`close`] and [`finish`] consuming the
/// reporter. The write destination is any `io::Write`; where the bytes land
/// is the host's concern.
///
/// [`start_test`]: TestngReporter::start_test
/// [`report_problem`]: TestngReporter::report_problem
/// [`end_test`]: TestngReporter::end_test
/// [`close`]: TestngReporter::close
/// [`finish`]: TestngReporter::finish
#[derive(Clone, Debug, Default)]
pub struct TestngReporter {
    registry: ResultRegistry,
    report_name: String,
    trace_filter: Option<TraceFilter>,
}

impl TestngReporter {
    /// Creates a new reporter. The report name labels the umbrella
    /// suite/test pair in the output.
    pub fn new(report_name: impl Into<String>) -> Self {
        Self {
            registry: ResultRegistry::new(),
            report_name: report_name.into(),
            trace_filter: None,
        }
    }

    /// Filters emitted stack traces through the given noise filter.
    pub fn with_trace_filter(mut self, filter: TraceFilter) -> Self {
        self.trace_filter = Some(filter);
        self
    }

    /// Records the start of a test occurrence.
    pub fn start_test(&mut self, test: &dyn TestIdentity) {
        self.registry.start_test(test);
    }

    /// Records the start of a test occurrence at the given timestamp.
    pub fn start_test_at(&mut self, test: &dyn TestIdentity, now_ms: i64) {
        self.registry.start_test_at(test, now_ms);
    }

    /// Records a problem for a test occurrence.
    pub fn report_problem(
        &mut self,
        test: &dyn TestIdentity,
        kind: ProblemKind,
        failure: TestFailure,
    ) {
        self.registry.report_problem(test, kind, failure);
    }

    /// Records a problem for a test occurrence at the given timestamp.
    pub fn report_problem_at(
        &mut self,
        test: &dyn TestIdentity,
        kind: ProblemKind,
        failure: TestFailure,
        now_ms: i64,
    ) {
        self.registry.report_problem_at(test, kind, failure, now_ms);
    }

    /// Records the end of a test occurrence.
    pub fn end_test(&mut self, test: &dyn TestIdentity) {
        self.registry.end_test(test);
    }

    /// Records the end of a test occurrence at the given timestamp.
    pub fn end_test_at(&mut self, test: &dyn TestIdentity, now_ms: i64) {
        self.registry.end_test_at(test, now_ms);
    }

    /// Consumes the reporter into its finalized [`Report`] without
    /// serializing it.
    pub fn into_report(self) -> Report {
        let Self {
            registry,
            report_name,
            trace_filter,
        } = self;
        registry.into_report(report_name, trace_filter.as_ref())
    }

    /// Finalizes the report and serializes it to `writer`.
    pub fn finish(self, writer: impl io::Write) -> Result<(), SerializeError> {
        self.into_report().serialize(writer)
    }

    /// Finalizes the report and serializes it to `writer`, best-effort.
    ///
    /// Emission failures are logged, not propagated: a report that cannot be
    /// written must never abort the test run it was observing. The writer is
    /// dropped (and so released) on every path.
    pub fn close(self, writer: impl io::Write) {
        if let Err(error) = self.finish(writer) {
            log::error!("failed to write TestNG report: {error}");
        }
    }
}
