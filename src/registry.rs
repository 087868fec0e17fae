// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The result-aggregation core.
//!
//! A [`ResultRegistry`] folds test lifecycle events into per-test
//! [`TestKeeper`]s and per-suite [`SuiteAggregate`]s. The host driver
//! delivers, per test occurrence and in order: a start event, at most one
//! problem event, and an end event. Timing for an occurrence is finalized at
//! the *first* of (problem, end), so durations reflect actual execution
//! rather than report-generation delay.

use crate::{
    filter::TraceFilter,
    identity::TestIdentity,
    report::{Exception, Report, TestClass, TestMethod},
};
use chrono::Utc;
use indexmap::IndexMap;

/// The kind of problem reported for a test occurrence.
///
/// TestNG reports render errors as `SKIP` and assertion failures as `FAIL`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProblemKind {
    /// An error-class problem: something unexpected went wrong.
    Error,

    /// An assertion-class problem: the test ran and its expectation failed.
    Failure,
}

/// The terminal status of a test occurrence.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Status {
    /// No problem was recorded.
    #[default]
    Pass,

    /// An assertion-class failure was recorded.
    Fail,

    /// An error-class failure was recorded.
    Skip,
}

impl Status {
    /// Returns the status string used in the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Skip => "SKIP",
        }
    }
}

impl From<ProblemKind> for Status {
    fn from(kind: ProblemKind) -> Self {
        match kind {
            ProblemKind::Error => Status::Skip,
            ProblemKind::Failure => Status::Fail,
        }
    }
}

/// Captured detail for a problem reported against a test occurrence.
#[derive(Clone, Debug)]
pub struct TestFailure {
    /// The type name of the underlying error.
    pub type_name: String,

    /// The error message, if one was supplied.
    pub message: Option<String>,

    /// The stack trace rendered as text, one frame per line.
    pub trace: String,
}

impl TestFailure {
    /// Creates a new `TestFailure` with no message.
    pub fn new(type_name: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: None,
            trace: trace.into(),
        }
    }

    /// Sets the error message.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// Returns self with the message set.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The record of one test occurrence: identity, timing window, status and
/// captured failure detail.
#[derive(Clone, Debug)]
pub struct TestKeeper {
    /// The test name within its suite.
    pub name: String,

    /// Wall-clock start of the occurrence, in milliseconds.
    pub start_ms: i64,

    /// Wall-clock end of the occurrence, in milliseconds. Meaningful only
    /// once timing has been finalized.
    pub end_ms: i64,

    /// The terminal status. Defaults to [`Status::Pass`].
    pub status: Status,

    /// Captured failure detail. Present iff `status != Pass`.
    pub failure: Option<TestFailure>,

    // End time is written at most once per occurrence, by whichever of
    // (problem, end) arrives first.
    timed: bool,
}

impl TestKeeper {
    fn started(name: impl Into<String>, now_ms: i64) -> Self {
        Self {
            name: name.into(),
            start_ms: now_ms,
            end_ms: 0,
            status: Status::Pass,
            failure: None,
            timed: false,
        }
    }

    /// Returns the end of the timing window, falling back to the start for
    /// an occurrence that was never finalized.
    pub fn effective_end_ms(&self) -> i64 {
        if self.timed {
            self.end_ms
        } else {
            self.start_ms
        }
    }

    fn mark_end_once(&mut self, now_ms: i64) {
        if self.timed {
            return;
        }
        self.timed = true;
        self.end_ms = now_ms;
    }

    fn record_problem(&mut self, kind: ProblemKind, failure: TestFailure) {
        self.status = kind.into();
        self.failure = Some(failure);
    }
}

/// Monotone time bounds: start only decreases once seeded, end only
/// increases. Unseeded bounds render as zero (the epoch) in reports.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TimeBounds {
    start_ms: i64,
    end_ms: i64,
    // A stored start of 0 is a legitimate timestamp, so seeding is tracked
    // separately rather than with a zero sentinel.
    seeded: bool,
}

impl TimeBounds {
    /// The earliest recorded start, in milliseconds.
    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    /// The latest recorded end, in milliseconds.
    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    fn record_start(&mut self, now_ms: i64) {
        if !self.seeded || now_ms < self.start_ms {
            self.start_ms = now_ms;
            self.seeded = true;
        }
    }

    fn record_end(&mut self, now_ms: i64) {
        if now_ms > self.end_ms {
            self.end_ms = now_ms;
        }
    }
}

/// Per-suite rollup: time bounds over all contained occurrences plus
/// problem counters.
#[derive(Clone, Debug, Default)]
pub struct SuiteAggregate {
    bounds: TimeBounds,
    failures: usize,
    errors: usize,
}

impl SuiteAggregate {
    /// The min/max time bounds over all occurrences in this suite.
    pub fn bounds(&self) -> TimeBounds {
        self.bounds
    }

    /// The number of assertion-class failures recorded for this suite.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// The number of error-class failures recorded for this suite.
    pub fn errors(&self) -> usize {
        self.errors
    }
}

#[derive(Clone, Debug, Default)]
struct SuiteEntry {
    aggregate: SuiteAggregate,
    tests: IndexMap<String, TestKeeper>,
}

/// Owns all observed results, keyed by suite name and test name.
///
/// Mutations are expected to arrive strictly sequentially from the host
/// driver; the registry performs no internal locking. A concurrent host must
/// wrap the registry (or the [`TestngReporter`](crate::TestngReporter)) in a
/// mutex.
///
/// Every lifecycle operation has a `*_at` variant taking an explicit
/// millisecond timestamp, for hosts that timestamp their own events; the
/// plain variants sample the wall clock.
#[derive(Clone, Debug, Default)]
pub struct ResultRegistry {
    total: usize,
    error_count: usize,
    failure_count: usize,
    bounds: TimeBounds,
    suites: IndexMap<String, SuiteEntry>,
}

impl ResultRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a test occurrence.
    ///
    /// Increments the total count, creates a fresh keeper with status
    /// [`Status::Pass`], and seeds the suite aggregate if this is the first
    /// occurrence seen for the suite. A keeper already stored under the same
    /// (suite, test name) pair is overwritten: the model does not
    /// distinguish repeated runs of an identically named test within one
    /// report.
    pub fn start_test(&mut self, test: &dyn TestIdentity) {
        self.start_test_at(test, now_ms());
    }

    /// Records the start of a test occurrence at the given timestamp.
    pub fn start_test_at(&mut self, test: &dyn TestIdentity, now_ms: i64) {
        self.total += 1;
        self.bounds.record_start(now_ms);
        let entry = self.suites.entry(test.suite_name().to_owned()).or_default();
        entry.aggregate.bounds.record_start(now_ms);
        entry.tests.insert(
            test.test_name().to_owned(),
            TestKeeper::started(test.test_name(), now_ms),
        );
    }

    /// Records a problem for a test occurrence.
    ///
    /// Finalizes the occurrence's timing if the end has not been written
    /// yet, records the failure detail, maps the kind to a status
    /// (error → SKIP, failure → FAIL), and bumps the suite and registry
    /// counters for the kind. A problem reported for a test that was never
    /// started synthesizes a keeper starting now rather than failing.
    pub fn report_problem(
        &mut self,
        test: &dyn TestIdentity,
        kind: ProblemKind,
        failure: TestFailure,
    ) {
        self.report_problem_at(test, kind, failure, now_ms());
    }

    /// Records a problem for a test occurrence at the given timestamp.
    pub fn report_problem_at(
        &mut self,
        test: &dyn TestIdentity,
        kind: ProblemKind,
        failure: TestFailure,
        now_ms: i64,
    ) {
        self.finalize_timing(test, now_ms);
        match kind {
            ProblemKind::Error => self.error_count += 1,
            ProblemKind::Failure => self.failure_count += 1,
        }
        let entry = self.suites.entry(test.suite_name().to_owned()).or_default();
        match kind {
            ProblemKind::Error => entry.aggregate.errors += 1,
            ProblemKind::Failure => entry.aggregate.failures += 1,
        }
        let keeper = entry
            .tests
            .entry(test.test_name().to_owned())
            .or_insert_with(|| TestKeeper::started(test.test_name(), now_ms));
        keeper.record_problem(kind, failure);
    }

    /// Records the end of a test occurrence.
    ///
    /// Idempotent: if a problem report already finalized the timing, the end
    /// time is left untouched.
    pub fn end_test(&mut self, test: &dyn TestIdentity) {
        self.end_test_at(test, now_ms());
    }

    /// Records the end of a test occurrence at the given timestamp.
    pub fn end_test_at(&mut self, test: &dyn TestIdentity, now_ms: i64) {
        self.finalize_timing(test, now_ms);
    }

    /// Writes the end time for the occurrence exactly once. The suite and
    /// registry end bounds track the raw event time on every finalize, so a
    /// late end event still extends the report window even though the
    /// keeper's duration stays fixed. Synthesizes a keeper (and seeds the
    /// suite bounds) if the test was never started.
    fn finalize_timing(&mut self, test: &dyn TestIdentity, now_ms: i64) {
        let entry = self.suites.entry(test.suite_name().to_owned()).or_default();
        let keeper = entry
            .tests
            .entry(test.test_name().to_owned())
            .or_insert_with(|| TestKeeper::started(test.test_name(), now_ms));
        entry.aggregate.bounds.record_start(keeper.start_ms);
        self.bounds.record_start(keeper.start_ms);
        keeper.mark_end_once(now_ms);
        entry.aggregate.bounds.record_end(now_ms);
        self.bounds.record_end(now_ms);
    }

    /// The number of start events observed.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The number of error-class problems observed.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The number of assertion-class problems observed.
    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// The number of occurrences with no problem recorded.
    ///
    /// Saturating: a malformed event sequence (problems without starts) can
    /// push the problem counts past the start count, and must not panic the
    /// reporter.
    pub fn passed(&self) -> usize {
        self.total.saturating_sub(self.error_count + self.failure_count)
    }

    /// The min start / max end over all occurrences across all suites.
    pub fn bounds(&self) -> TimeBounds {
        self.bounds
    }

    /// The aggregate for a suite, if any occurrence has been seen for it.
    pub fn suite_aggregate(&self, suite_name: &str) -> Option<&SuiteAggregate> {
        self.suites.get(suite_name).map(|entry| &entry.aggregate)
    }

    /// The keeper stored for a (suite, test name) pair, if any.
    pub fn keeper(&self, suite_name: &str, test_name: &str) -> Option<&TestKeeper> {
        self.suites.get(suite_name)?.tests.get(test_name)
    }

    /// Consumes the registry into a [`Report`] named `name`.
    ///
    /// Suites and tests appear in first-seen order. Stack traces are passed
    /// through `filter` when one is supplied. The report window covers every
    /// occurrence, including ones that never ended; those render with
    /// end = start.
    pub fn into_report(self, name: impl Into<String>, filter: Option<&TraceFilter>) -> Report {
        let mut report = Report::new(name);
        report.set_counts(self.total, self.failure_count, self.error_count);
        let mut bounds = self.bounds;
        for (suite_name, entry) in self.suites {
            let mut class = TestClass::new(suite_name);
            for (_, keeper) in entry.tests {
                let end_ms = keeper.effective_end_ms();
                bounds.record_start(keeper.start_ms);
                bounds.record_end(end_ms);
                let mut method = TestMethod::new(keeper.name, keeper.status);
                method.set_window(keeper.start_ms, end_ms);
                if let Some(failure) = keeper.failure {
                    let trace = match filter {
                        Some(filter) => filter.filter(&failure.trace),
                        None => failure.trace,
                    };
                    let mut exception = Exception::new(failure.type_name, trace);
                    if let Some(message) = failure.message {
                        exception.set_message(message);
                    }
                    method.set_exception(exception);
                }
                class.add_test_method(method);
            }
            report.add_class(class);
        }
        report.set_window(bounds.start_ms, bounds.end_ms);
        report
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
