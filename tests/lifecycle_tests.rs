// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving full event sequences through the reporter.

use quick_testng::{
    DataDrivenTestId, ProblemKind, TestFailure, TestId, TestngReporter, TraceFilter,
};

fn serialize(reporter: TestngReporter) -> String {
    let mut out: Vec<u8> = vec![];
    reporter
        .finish(&mut out)
        .expect("serializing to a Vec succeeds");
    String::from_utf8(out).expect("report is valid UTF-8")
}

#[test]
fn two_tests_one_failure_scenario() {
    let mut reporter = TestngReporter::new("run");
    let test1 = TestId::new("A", "test1");
    let test2 = TestId::new("A", "test2");

    reporter.start_test_at(&test1, 0);
    reporter.start_test_at(&test2, 5);
    reporter.end_test_at(&test1, 10);
    reporter.report_problem_at(
        &test2,
        ProblemKind::Failure,
        TestFailure::new("AssertionError", "AssertionError: boom\n").with_message("boom"),
        12,
    );
    reporter.end_test_at(&test2, 15);

    let xml = serialize(reporter);
    assert!(
        xml.contains(r#"<testng-results skipped="0" failed="1" total="2" passed="1">"#),
        "summary attributes reconcile: {xml}"
    );
    assert!(
        xml.contains(r#"<suite name="run" duration-ms="0.015""#),
        "suite duration is (15 - 0) / 1000: {xml}"
    );
    assert!(
        xml.contains(r#"<test-method status="PASS" signature="test1" name="test1" duration-ms="0.010""#),
        "test1 passes with duration 0.010: {xml}"
    );
    assert!(
        xml.contains(r#"<test-method status="FAIL" signature="test2" name="test2" duration-ms="0.007""#),
        "test2 duration is fixed at the problem report (12 - 5): {xml}"
    );
    assert!(
        xml.contains("<message>AssertionError: boom</message>"),
        "failure message is rendered: {xml}"
    );
}

#[test]
fn error_with_no_message_gets_null_placeholder() {
    let mut reporter = TestngReporter::new("run");
    let test = TestId::new("A", "errors");

    reporter.start_test_at(&test, 0);
    reporter.report_problem_at(
        &test,
        ProblemKind::Error,
        TestFailure::new("IoError", "IoError\n    at A::errors\n"),
        8,
    );
    reporter.end_test_at(&test, 9);

    let xml = serialize(reporter);
    assert!(
        xml.contains(r#"<test-method status="SKIP""#),
        "errors render as SKIP: {xml}"
    );
    assert!(
        xml.contains("<message>IoError: &lt;null&gt;</message>"),
        "missing message gets the literal placeholder: {xml}"
    );
    assert!(
        !xml.contains("<message></message>"),
        "message tag is never empty: {xml}"
    );
}

#[test]
fn counts_reconcile_for_arbitrary_sequences() {
    // start / [problem] / end sequences with every outcome, across suites.
    let outcomes = [
        ("s1", "a", None),
        ("s1", "b", Some(ProblemKind::Failure)),
        ("s2", "c", Some(ProblemKind::Error)),
        ("s2", "d", None),
        ("s3", "e", Some(ProblemKind::Failure)),
        ("s1", "f", None),
    ];

    let mut reporter = TestngReporter::new("run");
    let mut now = 0;
    for (suite, name, problem) in outcomes {
        let test = TestId::new(suite, name);
        reporter.start_test_at(&test, now);
        if let Some(kind) = problem {
            reporter.report_problem_at(&test, kind, TestFailure::new("Err", "Err\n"), now + 5);
        }
        reporter.end_test_at(&test, now + 10);
        now += 20;
    }

    let report = reporter.into_report();
    assert_eq!(report.total, 6);
    assert_eq!(report.failed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.passed() + report.failed + report.skipped, report.total);

    // Suites appear in first-seen order, each exactly once.
    let names: Vec<&str> = report.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["s1", "s2", "s3"]);
    let method_count: usize = report.classes.iter().map(|c| c.test_methods.len()).sum();
    assert_eq!(method_count, 6);
}

#[test]
fn trace_filter_applies_to_emitted_traces_only() {
    let mut reporter =
        TestngReporter::new("run").with_trace_filter(TraceFilter::new(["noise::frame"]));
    let test = TestId::new("A", "fails");

    reporter.start_test_at(&test, 0);
    reporter.report_problem_at(
        &test,
        ProblemKind::Failure,
        TestFailure::new(
            "AssertionError",
            "AssertionError: noise::frame mentioned here\n    at real::frame\n    at noise::frame::run\n",
        )
        .with_message("noise::frame mentioned here"),
        5,
    );
    reporter.end_test_at(&test, 10);

    let xml = serialize(reporter);
    assert!(
        xml.contains("    at real::frame\n"),
        "non-matching trace lines survive: {xml}"
    );
    assert!(
        !xml.contains("at noise::frame::run"),
        "matching trace lines are dropped: {xml}"
    );
    assert!(
        xml.contains("<message>AssertionError: noise::frame mentioned here</message>"),
        "the message field is never filtered: {xml}"
    );
}

#[test]
fn data_driven_tests_report_under_custom_name() {
    let mut reporter = TestngReporter::new("run");
    let test = DataDrivenTestId::new("A", "parameterized", "parameterized[row 2]");

    reporter.start_test_at(&test, 0);
    reporter.end_test_at(&test, 4);

    let xml = serialize(reporter);
    assert!(
        xml.contains(r#"signature="parameterized[row 2]" name="parameterized[row 2]""#),
        "custom name is used for both name and signature: {xml}"
    );
}

#[test]
fn unterminated_test_renders_zero_duration_window() {
    let mut reporter = TestngReporter::new("run");
    let test = TestId::new("A", "hangs");
    reporter.start_test_at(&test, 1_000_000);
    // No problem and no end before close.

    let xml = serialize(reporter);
    assert!(
        xml.contains(
            r#"<suite name="run" duration-ms="0.000" started-at="1970-01-01T00:16:40" finished-at="1970-01-01T00:16:40">"#
        ),
        "the report window closes at the start, never before it: {xml}"
    );
    assert!(
        xml.contains(r#"<test-method status="PASS" signature="hangs" name="hangs" duration-ms="0.000""#),
        "the occurrence renders with end = start: {xml}"
    );
}

#[test]
fn empty_run_still_produces_schema_correct_report() {
    let reporter = TestngReporter::new("run");
    let xml = serialize(reporter);
    assert!(
        xml.contains(r#"<testng-results skipped="0" failed="0" total="0" passed="0">"#),
        "empty summary: {xml}"
    );
    assert!(xml.contains("<reporter-output/>"), "{xml}");
    assert!(xml.contains("<groups/>"), "{xml}");
    assert!(xml.ends_with("</testng-results>\n"), "{xml}");
}
