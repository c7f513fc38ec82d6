// SPDX-License-Identifier: MIT OR Apache-2.0
//! Predefined error codes.
//!
//! Each entry is a self-contained `static` literal; there is no
//! initialisation order between them.

use crate::{ErrType, ErrorCode};

/// Unexpected internal failure (500).
pub static INTERNAL: ErrorCode =
    ErrorCode::new("INTERNAL", "Internal Server Error", 500, ErrType::Internal);

/// Operation timed out (408).
pub static TIMEOUT: ErrorCode = ErrorCode::new("TIMEOUT", "Request Timeout", 408, ErrType::Timeout);

/// Resource not found (404).
pub static NOT_FOUND: ErrorCode = ErrorCode::new("NOT_FOUND", "Not Found", 404, ErrType::NotFound);

/// Malformed request or invalid parameters (400).
pub static BAD_REQUEST: ErrorCode =
    ErrorCode::new("BAD_REQUEST", "Bad Request", 400, ErrType::BadRequest);

/// Caller not authenticated (401).
pub static UNAUTHORIZED: ErrorCode =
    ErrorCode::new("UNAUTHORIZED", "Unauthorized", 401, ErrType::Unauthorized);

/// Caller not allowed (403).
pub static FORBIDDEN: ErrorCode = ErrorCode::new("FORBIDDEN", "Forbidden", 403, ErrType::Forbidden);

/// Resource state conflict (409).
pub static CONFLICT: ErrorCode =
    ErrorCode::new("CONFLICT", "Resource Conflict", 409, ErrType::Conflict);

/// Rate limit exceeded (429).
pub static RATE_LIMIT: ErrorCode =
    ErrorCode::new("RATE_LIMIT", "Rate Limit Exceeded", 429, ErrType::RateLimit);

/// Username already registered (409).
pub static USERNAME_EXISTED: ErrorCode = ErrorCode::new(
    "USERNAME_EXISTED",
    "Username already exists",
    409,
    ErrType::Conflict,
);

/// Email already registered (409).
pub static EMAIL_EXISTED: ErrorCode =
    ErrorCode::new("EMAIL_EXISTED", "Email already exists", 409, ErrType::Conflict);

/// Phone number already registered (409).
pub static PHONE_EXISTED: ErrorCode =
    ErrorCode::new("PHONE_EXISTED", "Phone already exists", 409, ErrType::Conflict);

/// Generic business-rule failure (500).
pub static BUSINESS: ErrorCode = ErrorCode::new("BUSINESS", "Business error", 500, ErrType::Business);

/// Every predefined entry.
pub static ALL: &[&ErrorCode] = &[
    &INTERNAL,
    &TIMEOUT,
    &NOT_FOUND,
    &BAD_REQUEST,
    &UNAUTHORIZED,
    &FORBIDDEN,
    &CONFLICT,
    &RATE_LIMIT,
    &USERNAME_EXISTED,
    &EMAIL_EXISTED,
    &PHONE_EXISTED,
    &BUSINESS,
];

/// Find a predefined entry by its symbolic code.
pub fn lookup(code: &str) -> Option<&'static ErrorCode> {
    ALL.iter().copied().find(|c| c.code() == code)
}
