// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collect test lifecycle events and generate TestNG-compatible XML reports.
//!
//! A host test driver delivers start/problem/end events for each test
//! occurrence to a [`TestngReporter`]; on close the reporter serializes
//! everything it observed into the `testng-results` schema. The crate does
//! not execute, discover, or interpret tests; it only observes and renders.
//!
//! # Overview
//!
//! ```
//! use quick_testng::{ProblemKind, TestFailure, TestId, TestngReporter};
//!
//! let mut reporter = TestngReporter::new("nightly run");
//!
//! let test = TestId::new("app::auth", "login_succeeds");
//! reporter.start_test(&test);
//! reporter.end_test(&test);
//!
//! let test = TestId::new("app::auth", "login_rejects_bad_password");
//! reporter.start_test(&test);
//! reporter.report_problem(
//!     &test,
//!     ProblemKind::Failure,
//!     TestFailure::new("AssertionError", "AssertionError: expected rejection\n")
//!         .with_message("expected rejection"),
//! );
//! reporter.end_test(&test);
//!
//! let mut out: Vec<u8> = vec![];
//! reporter.close(&mut out);
//! let xml = String::from_utf8(out).unwrap();
//! assert!(xml.starts_with("<?xml"));
//! ```

mod errors;
mod filter;
mod identity;
mod registry;
mod report;
mod reporter;
mod serialize;

pub use errors::*;
pub use filter::*;
pub use identity::*;
pub use registry::*;
pub use report::*;
pub use reporter::*;
