// SPDX-License-Identifier: MIT OR Apache-2.0
//! Coarse error classification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification tag carried by every error code.
///
/// Downstream collaborators route on this (log level, response shape); the
/// tag itself has no behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrType {
    /// Unexpected failure inside the service.
    Internal,
    /// Malformed request.
    BadRequest,
    /// Caller is not authenticated.
    Unauthorized,
    /// Caller is authenticated but not allowed.
    Forbidden,
    /// Requested resource does not exist.
    NotFound,
    /// Request conflicts with current resource state.
    Conflict,
    /// Input failed validation rules.
    Validation,
    /// A business rule rejected the operation.
    Business,
    /// An operation did not finish in time.
    Timeout,
    /// Caller exceeded a rate limit.
    RateLimit,
    /// An external dependency failed.
    External,
}

impl ErrType {
    /// Every variant, in declaration order.
    pub const ALL: [ErrType; 11] = [
        ErrType::Internal,
        ErrType::BadRequest,
        ErrType::Unauthorized,
        ErrType::Forbidden,
        ErrType::NotFound,
        ErrType::Conflict,
        ErrType::Validation,
        ErrType::Business,
        ErrType::Timeout,
        ErrType::RateLimit,
        ErrType::External,
    ];

    /// Stable `&'static str` form (e.g. `"BAD_REQUEST"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Validation => "VALIDATION",
            Self::Business => "BUSINESS",
            Self::Timeout => "TIMEOUT",
            Self::RateLimit => "RATE_LIMIT",
            Self::External => "EXTERNAL",
        }
    }
}

impl fmt::Display for ErrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no [`ErrType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownErrType(pub String);

impl fmt::Display for UnknownErrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error type '{}'", self.0)
    }
}

impl std::error::Error for UnknownErrType {}

impl FromStr for ErrType {
    type Err = UnknownErrType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownErrType(s.to_owned()))
    }
}
