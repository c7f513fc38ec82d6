// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error code definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::ErrType;

/// Immutable description of one error kind.
///
/// Catalog entries are `static` literals built with [`ErrorCode::new`];
/// callers can define their own the same way, or with
/// [`ErrorCode::owned`] when the strings are only known at runtime.
/// Uniqueness of `code` is a convention and is not checked.
///
/// ```
/// use faultline_error::{ErrType, ErrorCode};
///
/// static QUOTA_EXCEEDED: ErrorCode =
///     ErrorCode::new("QUOTA_EXCEEDED", "Quota exceeded", 429, ErrType::RateLimit);
///
/// assert_eq!(QUOTA_EXCEEDED.code(), "QUOTA_EXCEEDED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ErrorCode {
    code: Cow<'static, str>,
    message: Cow<'static, str>,
    http_status: u16,
    #[serde(rename = "type")]
    err_type: ErrType,
}

impl ErrorCode {
    /// Define a code from static strings; usable in `static` items.
    pub const fn new(
        code: &'static str,
        message: &'static str,
        http_status: u16,
        err_type: ErrType,
    ) -> Self {
        Self {
            code: Cow::Borrowed(code),
            message: Cow::Borrowed(message),
            http_status,
            err_type,
        }
    }

    /// Define a code from runtime strings.
    pub fn owned(
        code: impl Into<String>,
        message: impl Into<String>,
        http_status: u16,
        err_type: ErrType,
    ) -> Self {
        Self {
            code: Cow::Owned(code.into()),
            message: Cow::Owned(message.into()),
            http_status,
            err_type,
        }
    }

    /// Stable symbolic identifier.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Default human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Conventional HTTP status.
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Classification tag.
    pub fn err_type(&self) -> ErrType {
        self.err_type
    }

    pub(crate) fn code_cow(&self) -> Cow<'static, str> {
        self.code.clone()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.code, self.http_status, self.err_type)
    }
}
