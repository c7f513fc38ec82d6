// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logging for faultline errors.
//!
//! This crate defines the small [`Logger`] interface applications log
//! through, a [`TracingLogger`] adapter that forwards to `tracing`, and the
//! projection of a [`Fault`] into ordered [`Field`]s with a level chosen
//! from its [`ErrType`].
#![deny(unsafe_code)]
#![warn(missing_docs)]

use chrono::{DateTime, SecondsFormat, Utc};
use faultline_error::{ErrType, Fault};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Typed value of a log [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Boolean flag.
    Bool(bool),
    /// Elapsed time.
    Duration(Duration),
    /// Point in time.
    Time(DateTime<Utc>),
    /// Arbitrary structured value.
    Json(serde_json::Value),
    /// Rendered error.
    Error(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) | Self::Error(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// One key/value pair attached to a log call.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub key: String,
    /// Field value.
    pub value: FieldValue,
}

impl Field {
    /// Text field.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    /// Signed integer field.
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    /// Unsigned integer field.
    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint(value))
    }

    /// Boolean field.
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    /// Duration field.
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    /// Timestamp field.
    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    /// Structured field; values that fail to serialise become `null`.
    pub fn json(key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        Self::new(key, FieldValue::Json(value))
    }

    /// Error field, rendered with its `Display` form.
    pub fn error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self::new(key, FieldValue::Error(err.to_string()))
    }

    fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Render fields as space-separated `key=value` pairs, in order.
pub fn render_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Leveled logging interface.
pub trait Logger: Send + Sync {
    /// Diagnostic detail.
    fn debug(&self, msg: &str, fields: &[Field]);
    /// Normal operation.
    fn info(&self, msg: &str, fields: &[Field]);
    /// Something unexpected but handled.
    fn warn(&self, msg: &str, fields: &[Field]);
    /// A failure.
    fn error(&self, msg: &str, fields: &[Field]);
    /// Log, then terminate the process.
    fn fatal(&self, msg: &str, fields: &[Field]);
    /// Log, then panic with `msg`.
    fn panic(&self, msg: &str, fields: &[Field]);
}

/// [`Logger`] backed by the current `tracing` subscriber.
///
/// Fields are rendered into a single `fields` attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, msg: &str, fields: &[Field]) {
        debug!(fields = %render_fields(fields), "{msg}");
    }

    fn info(&self, msg: &str, fields: &[Field]) {
        info!(fields = %render_fields(fields), "{msg}");
    }

    fn warn(&self, msg: &str, fields: &[Field]) {
        warn!(fields = %render_fields(fields), "{msg}");
    }

    fn error(&self, msg: &str, fields: &[Field]) {
        error!(fields = %render_fields(fields), "{msg}");
    }

    fn fatal(&self, msg: &str, fields: &[Field]) {
        error!(fields = %render_fields(fields), fatal = true, "{msg}");
        std::process::exit(1);
    }

    fn panic(&self, msg: &str, fields: &[Field]) {
        error!(fields = %render_fields(fields), "{msg}");
        panic!("{msg}");
    }
}

// ---------------------------------------------------------------------------
// Fault projection
// ---------------------------------------------------------------------------

/// Severity used when logging a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    /// Expected client-side failures.
    Info,
    /// Rejected business operations and invalid input.
    Warn,
    /// Server-side failures.
    Error,
}

impl LogLevel {
    /// Message used by [`log_fault`] at this level.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Error => "internal error",
            Self::Warn => "business error",
            Self::Info => "client error",
        }
    }
}

/// Level for an error of type `err_type`.
pub fn level_for(err_type: ErrType) -> LogLevel {
    match err_type {
        ErrType::Internal | ErrType::Timeout | ErrType::External => LogLevel::Error,
        ErrType::Business | ErrType::Validation => LogLevel::Warn,
        _ => LogLevel::Info,
    }
}

/// Project a fault into ordered log fields.
///
/// Always `code`, `type`, `message`, `http_status`, `timestamp`; then
/// `metadata` when non-empty, `cause` when present and `stack_trace` when
/// captured.
pub fn fault_fields(fault: &Fault) -> Vec<Field> {
    let mut fields = vec![
        Field::string("code", fault.code()),
        Field::string("type", fault.err_type().as_str()),
        Field::string("message", fault.message()),
        Field::uint("http_status", u64::from(fault.http_status())),
        Field::time("timestamp", fault.timestamp()),
    ];
    if let Some(metadata) = fault.metadata() {
        if !metadata.is_empty() {
            fields.push(Field::json("metadata", metadata));
        }
    }
    if let Some(cause) = fault.cause() {
        fields.push(Field::error("cause", &**cause));
    }
    if fault.has_stack_trace() {
        fields.push(Field::string("stack_trace", fault.stack_trace()));
    }
    fields
}

/// Log `fault` through `logger` at the level chosen by [`level_for`].
pub fn log_fault(logger: &dyn Logger, fault: &Fault) -> LogLevel {
    let level = level_for(fault.err_type());
    let fields = fault_fields(fault);
    match level {
        LogLevel::Error => logger.error(level.summary(), &fields),
        LogLevel::Warn => logger.warn(level.summary(), &fields),
        LogLevel::Info => logger.info(level.summary(), &fields),
    }
    level
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
