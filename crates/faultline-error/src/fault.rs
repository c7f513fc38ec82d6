// SPDX-License-Identifier: MIT OR Apache-2.0
//! The [`Fault`] error value.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::settings::Capture;
use crate::{BoxError, Cause, ErrType, ErrorCode, Metadata};

/// A structured error.
///
/// Identity fields (code, message, status, type), the timestamp, the cause
/// and the stack trace are fixed at construction. Metadata is the only part
/// that can change afterwards, through [`Fault::with_metadata`] and
/// friends.
///
/// Cloning is cheap for the cause, which is shared.
#[derive(Clone)]
pub struct Fault {
    code: Cow<'static, str>,
    message: String,
    http_status: u16,
    err_type: ErrType,
    timestamp: DateTime<Utc>,
    cause: Option<Cause>,
    metadata: Option<Metadata>,
    stack_trace: Option<String>,
}

impl Fault {
    pub(crate) fn assemble(
        code: &ErrorCode,
        message: String,
        cause: Option<Cause>,
        capture: Capture,
    ) -> Self {
        Self {
            code: code.code_cow(),
            message,
            http_status: code.http_status(),
            err_type: code.err_type(),
            timestamp: Utc::now(),
            cause,
            metadata: None,
            stack_trace: capture.run(),
        }
    }

    /// Symbolic code copied from the [`ErrorCode`].
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status copied from the [`ErrorCode`].
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Classification copied from the [`ErrorCode`].
    pub fn err_type(&self) -> ErrType {
        self.err_type
    }

    /// Construction time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Captured stack report, or `""` when nothing was captured.
    pub fn stack_trace(&self) -> &str {
        self.stack_trace.as_deref().unwrap_or_default()
    }

    /// Whether a stack report was captured.
    pub fn has_stack_trace(&self) -> bool {
        self.stack_trace.is_some()
    }

    /// Attached metadata; `None` if no metadata call was ever made.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// The wrapped error, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    /// Attach a metadata entry, replacing any previous value for `key`.
    ///
    /// Values that fail to serialise are skipped.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.insert_metadata(key, value);
        self
    }

    /// Merge every entry of `entries`, key by key.
    #[must_use]
    pub fn with_metadata_map<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Serialize,
    {
        self.extend_metadata(entries);
        self
    }

    /// In-place form of [`Fault::with_metadata`].
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Serialize) -> &mut Self {
        let map = self.metadata.get_or_insert_with(Metadata::new);
        if let Ok(v) = serde_json::to_value(value) {
            map.insert(key.into(), v);
        }
        self
    }

    /// In-place form of [`Fault::with_metadata_map`].
    pub fn extend_metadata<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Serialize,
    {
        let map = self.metadata.get_or_insert_with(Metadata::new);
        for (key, value) in entries {
            if let Ok(v) = serde_json::to_value(value) {
                map.insert(key.into(), v);
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Pool support
    // -----------------------------------------------------------------------

    pub(crate) fn blank() -> Self {
        Self {
            code: Cow::Borrowed(""),
            message: String::new(),
            http_status: 0,
            err_type: ErrType::Internal,
            timestamp: DateTime::<Utc>::default(),
            cause: None,
            metadata: None,
            stack_trace: None,
        }
    }

    /// Clear every field, keeping the message buffer.
    pub(crate) fn reset(&mut self) {
        self.code = Cow::Borrowed("");
        self.message.clear();
        self.http_status = 0;
        self.err_type = ErrType::Internal;
        self.timestamp = DateTime::<Utc>::default();
        self.cause = None;
        self.metadata = None;
        self.stack_trace = None;
    }

    /// Reinitialise recycled storage as a fresh fault.
    pub(crate) fn refill(
        &mut self,
        code: &ErrorCode,
        message: fmt::Arguments<'_>,
        cause: Option<Cause>,
        capture: Capture,
    ) {
        self.reset();
        self.code = code.code_cow();
        // Writing into a String cannot fail.
        let _ = self.message.write_fmt(message);
        self.http_status = code.http_status();
        self.err_type = code.err_type();
        self.timestamp = Utc::now();
        self.cause = cause;
        self.stack_trace = capture.run();
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Fault");
        d.field("code", &self.code);
        d.field("message", &self.message);
        d.field("http_status", &self.http_status);
        d.field("err_type", &self.err_type);
        d.field("timestamp", &self.timestamp);
        if let Some(ref cause) = self.cause {
            d.field("cause", &cause.to_string());
        }
        if let Some(ref metadata) = self.metadata {
            d.field("metadata", metadata);
        }
        if self.stack_trace.is_some() {
            d.field("stack_trace", &"<captured>");
        }
        d.finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(ref cause) = self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

/// First [`Fault`] in the chain starting at `err` (inclusive), following
/// [`Error::source`].
///
/// Faults held behind a [`Cause`], an `Arc<Fault>` or a `Box<Fault>` are
/// found too. Those handles forward `source()` past the value they hold, so
/// each link is looked through before moving on.
pub fn find_fault<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Fault> {
    let mut current = Some(err);
    while let Some(link) = current {
        if let Some(fault) = link.downcast_ref::<Fault>() {
            return Some(fault);
        }
        if let Some(fault) = link.downcast_ref::<Box<Fault>>() {
            return Some(&**fault);
        }
        if let Some(fault) = link.downcast_ref::<Arc<Fault>>() {
            return Some(&**fault);
        }
        if let Some(shared) = link.downcast_ref::<Cause>() {
            return find_fault(&**shared as &(dyn Error + 'static));
        }
        current = link.source();
    }
    None
}

/// Whether `err` or anything in its source chain is a [`Fault`].
pub fn is_fault(err: &(dyn Error + 'static)) -> bool {
    find_fault(err).is_some()
}

/// What a wrap call received: an existing fault to hand back unchanged, or
/// a foreign error to record as the cause of a new one.
pub(crate) enum WrapTarget {
    Existing(Fault),
    Foreign(Cause),
}

impl WrapTarget {
    pub(crate) fn classify(err: BoxError) -> Self {
        let err = match err.downcast::<Fault>() {
            Ok(fault) => return Self::Existing(*fault),
            Err(other) => other,
        };
        let err = match err.downcast::<Box<Fault>>() {
            Ok(fault) => return Self::Existing(**fault),
            Err(other) => other,
        };
        let err = match err.downcast::<Arc<Fault>>() {
            Ok(fault) => return Self::Existing(Arc::unwrap_or_clone(*fault)),
            Err(other) => other,
        };
        // An already shared cause is reused as-is rather than boxed again.
        let shared: Cause = match err.downcast::<Cause>() {
            Ok(shared) => *shared,
            Err(other) => Cause::from(other),
        };
        match find_fault(&*shared as &(dyn Error + 'static)) {
            Some(fault) => Self::Existing(fault.clone()),
            None => Self::Foreign(shared),
        }
    }
}
