// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use goldenfile::Mint;
use quick_testng::{ProblemKind, TestFailure, TestId, TestngReporter, TraceFilter};

#[test]
fn fixtures() {
    let mut mint = Mint::new("tests/fixtures");

    let f = mint
        .new_goldenfile("basic_report.xml")
        .expect("creating new goldenfile succeeds");

    let reporter = basic_reporter();
    reporter
        .finish(f)
        .expect("serializing basic report succeeds");
}

fn basic_reporter() -> TestngReporter {
    let mut reporter =
        TestngReporter::new("quick-testng demo").with_trace_filter(TraceFilter::default());

    let test = TestId::new("app::auth", "login_succeeds");
    reporter.start_test_at(&test, 1_000_000);
    reporter.end_test_at(&test, 1_000_250);

    let test = TestId::new("app::auth", "login_rejects_bad_password");
    reporter.start_test_at(&test, 1_000_300);
    reporter.report_problem_at(
        &test,
        ProblemKind::Failure,
        TestFailure::new(
            "AssertionError",
            "AssertionError: expected rejection\n    at app::auth::login_rejects_bad_password\n    at junit.framework.TestResult.run\n",
        )
        .with_message("expected rejection"),
        1_000_450,
    );
    reporter.end_test_at(&test, 1_000_500);

    let test = TestId::new("app::storage", "cache_evicts");
    reporter.start_test_at(&test, 1_000_600);
    reporter.report_problem_at(
        &test,
        ProblemKind::Error,
        TestFailure::new("IoError", "IoError\n    at app::storage::cache_evicts\n"),
        1_000_900,
    );
    // The problem report finalized this test's timing; the late end event
    // leaves the method window alone but still extends the report window.
    reporter.end_test_at(&test, 1_000_950);

    reporter
}
