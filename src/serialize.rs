// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report` to the testng-results schema.

use crate::{
    errors::SerializeError,
    report::{Exception, Report, TestClass, TestMethod},
};
use chrono::{TimeZone, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io;

static TESTNG_RESULTS_TAG: &str = "testng-results";
static REPORTER_OUTPUT_TAG: &str = "reporter-output";
static SUITE_TAG: &str = "suite";
static GROUPS_TAG: &str = "groups";
static TEST_TAG: &str = "test";
static CLASS_TAG: &str = "class";
static TEST_METHOD_TAG: &str = "test-method";
static EXCEPTION_TAG: &str = "exception";
static MESSAGE_TAG: &str = "message";
static FULL_STACKTRACE_TAG: &str = "full-stacktrace";

// Consumers parse the message field positionally, so an absent message is
// substituted rather than omitted.
static NULL_MESSAGE: &str = "<null>";

pub(crate) fn serialize_report(
    report: &Report,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

fn serialize_report_impl(
    report: &Report,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Report {
        name,
        total,
        failed,
        skipped,
        started_ms,
        finished_ms,
        classes,
    } = report;

    let mut results_tag = BytesStart::new(TESTNG_RESULTS_TAG);
    results_tag.extend_attributes([
        ("skipped", skipped.to_string().as_str()),
        ("failed", failed.to_string().as_str()),
        ("total", total.to_string().as_str()),
        ("passed", report.passed().to_string().as_str()),
    ]);
    writer.write_event(Event::Start(results_tag))?;

    writer.write_event(Event::Empty(BytesStart::new(REPORTER_OUTPUT_TAG)))?;

    // The report models everything as one umbrella suite/test pair spanning
    // the whole run.
    let duration = serialize_duration(*started_ms, *finished_ms);
    let started_at = serialize_timestamp(*started_ms);
    let finished_at = serialize_timestamp(*finished_ms);

    let mut suite_tag = BytesStart::new(SUITE_TAG);
    suite_tag.extend_attributes([
        ("name", name.as_str()),
        ("duration-ms", duration.as_str()),
        ("started-at", started_at.as_str()),
        ("finished-at", finished_at.as_str()),
    ]);
    writer.write_event(Event::Start(suite_tag))?;

    writer.write_event(Event::Empty(BytesStart::new(GROUPS_TAG)))?;

    let mut test_tag = BytesStart::new(TEST_TAG);
    test_tag.extend_attributes([
        ("name", name.as_str()),
        ("duration-ms", duration.as_str()),
        ("started-at", started_at.as_str()),
        ("finished-at", finished_at.as_str()),
    ]);
    writer.write_event(Event::Start(test_tag))?;

    for class in classes {
        serialize_class(class, writer)?;
    }

    serialize_end_tag(TEST_TAG, writer)?;
    serialize_end_tag(SUITE_TAG, writer)?;
    serialize_end_tag(TESTNG_RESULTS_TAG, writer)?;
    writer.write_event(Event::Eof)?;

    Ok(())
}

fn serialize_class(
    class: &TestClass,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let TestClass { name, test_methods } = class;

    let mut class_tag = BytesStart::new(CLASS_TAG);
    class_tag.push_attribute(("name", name.as_str()));
    writer.write_event(Event::Start(class_tag))?;

    for test_method in test_methods {
        serialize_test_method(test_method, writer)?;
    }

    serialize_end_tag(CLASS_TAG, writer)?;
    Ok(())
}

fn serialize_test_method(
    test_method: &TestMethod,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let TestMethod {
        name,
        status,
        started_ms,
        finished_ms,
        exception,
    } = test_method;

    let mut method_tag = BytesStart::new(TEST_METHOD_TAG);
    method_tag.extend_attributes([
        ("status", status.as_str()),
        ("signature", name.as_str()),
        ("name", name.as_str()),
        (
            "duration-ms",
            serialize_duration(*started_ms, *finished_ms).as_str(),
        ),
        ("started-at", serialize_timestamp(*started_ms).as_str()),
        ("finished-at", serialize_timestamp(*finished_ms).as_str()),
    ]);

    match exception {
        Some(exception) => {
            writer.write_event(Event::Start(method_tag))?;
            serialize_exception(exception, writer)?;
            serialize_end_tag(TEST_METHOD_TAG, writer)?;
        }
        None => {
            writer.write_event(Event::Empty(method_tag))?;
        }
    }

    Ok(())
}

fn serialize_exception(
    exception: &Exception,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let Exception {
        class_name,
        message,
        stack_trace,
    } = exception;

    let mut exception_tag = BytesStart::new(EXCEPTION_TAG);
    exception_tag.push_attribute(("class", class_name.as_str()));
    writer.write_event(Event::Start(exception_tag))?;

    let safe_message = format!(
        "{}: {}",
        class_name,
        message.as_ref().map_or(NULL_MESSAGE, |m| m.as_str())
    );
    writer.write_event(Event::Start(BytesStart::new(MESSAGE_TAG)))?;
    writer.write_event(Event::Text(BytesText::new(&safe_message)))?;
    serialize_end_tag(MESSAGE_TAG, writer)?;

    writer.write_event(Event::Start(BytesStart::new(FULL_STACKTRACE_TAG)))?;
    writer.write_event(Event::Text(BytesText::new(stack_trace.as_str())))?;
    serialize_end_tag(FULL_STACKTRACE_TAG, writer)?;

    serialize_end_tag(EXCEPTION_TAG, writer)?;
    Ok(())
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let end_tag = BytesEnd::new(tag_name);
    writer.write_event(Event::End(end_tag))?;
    Ok(())
}

// Serialize an elapsed window as seconds with 3 decimal points. Rust's
// formatting always uses a period for the decimal separator, regardless of
// host locale.
fn serialize_duration(started_ms: i64, finished_ms: i64) -> String {
    let elapsed_ms = (finished_ms - started_ms).max(0);
    format!("{:.3}", elapsed_ms as f64 / 1000.0)
}

// Fixed-pattern timestamp: year-month-day, literal 'T', hour:minute:second.
fn serialize_timestamp(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_seconds_with_three_decimals() {
        assert_eq!(serialize_duration(0, 15), "0.015");
        assert_eq!(serialize_duration(5, 12), "0.007");
        assert_eq!(serialize_duration(0, 0), "0.000");
        assert_eq!(serialize_duration(0, 61_500), "61.500");
        // A window that never closed must not render negative.
        assert_eq!(serialize_duration(100, 0), "0.000");
    }

    #[test]
    fn timestamp_uses_fixed_pattern() {
        assert_eq!(serialize_timestamp(0), "1970-01-01T00:00:00");
        assert_eq!(serialize_timestamp(1_000_000), "1970-01-01T00:16:40");
        // 2021-03-15T17:22:08 UTC.
        assert_eq!(serialize_timestamp(1_615_828_928_000), "2021-03-15T17:22:08");
    }
}
