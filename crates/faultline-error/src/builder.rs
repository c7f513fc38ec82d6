// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fluent builder for [`Fault`]s.

use serde::Serialize;

use crate::settings::Capture;
use crate::{BoxError, Cause, ErrorCode, Fault, Metadata, catalog};

/// Fluent builder for constructing [`Fault`]s.
///
/// Unset fields fall back to defaults: the code to
/// [`catalog::INTERNAL`], the message to the code's default message. A
/// non-fast build records a full stack report.
///
/// # Examples
///
/// ```
/// use faultline_error::{Builder, catalog};
///
/// let err = Builder::new()
///     .with_code(&catalog::NOT_FOUND)
///     .with_message("user 42 not found")
///     .with_metadata("user_id", 42)
///     .with_fast_mode(true)
///     .build();
///
/// assert_eq!(err.http_status(), 404);
/// assert_eq!(err.stack_trace(), "");
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Builder {
    code: Option<ErrorCode>,
    message: Option<String>,
    cause: Option<Cause>,
    metadata: Option<Metadata>,
    fast_mode: bool,
}

impl Builder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: &ErrorCode) -> Self {
        self.code = Some(code.clone());
        self
    }

    /// Override the message. An empty message keeps the code's default.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a cause.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(Cause::from(cause.into()));
        self
    }

    /// Add one metadata entry; a later value for the same key wins.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let map = self.metadata.get_or_insert_with(Metadata::new);
        if let Ok(v) = serde_json::to_value(value) {
            map.insert(key.into(), v);
        }
        self
    }

    /// Merge a set of metadata entries, key by key.
    pub fn with_metadata_map<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
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

    /// Skip stack capture on [`Builder::build`].
    pub fn with_fast_mode(mut self, fast: bool) -> Self {
        self.fast_mode = fast;
        self
    }

    /// Produce the fault. Never fails.
    #[must_use]
    pub fn build(self) -> Fault {
        let code = self.code.unwrap_or_else(|| catalog::INTERNAL.clone());
        let message = match self.message {
            Some(message) if !message.is_empty() => message,
            _ => code.message().to_owned(),
        };
        let capture = if self.fast_mode {
            Capture::Skip
        } else {
            Capture::Full
        };
        let mut fault = Fault::assemble(&code, message, self.cause, capture);
        if let Some(metadata) = self.metadata {
            fault.extend_metadata(metadata);
        }
        fault
    }
}
