// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Checker error types.

use std::time::Duration;

use thiserror::Error;

/// Why a check produced no result.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The request never got an HTTP response.
    #[error("checker HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("checker returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a check result.
    #[error("checker response parse error: {0}")]
    Parse(String),

    /// The check did not finish within the deadline.
    #[error("checker timed out after {0:?}")]
    Timeout(Duration),
}
