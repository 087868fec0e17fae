// Copyright (c) The quick-testng Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while serializing a [`Report`](crate::Report).
///
/// Returned by [`Report::serialize`](crate::Report::serialize) and
/// [`TestngReporter::finish`](crate::TestngReporter::finish).
#[derive(Debug, Error)]
#[error("error serializing TestNG report")]
pub struct SerializeError {
    #[from]
    inner: quick_xml::Error,
}
