// SPDX-License-Identifier: MIT OR Apache-2.0
//! Direct and wrapping constructors.

use std::fmt;
use tracing::trace;

use crate::fault::WrapTarget;
use crate::settings::Capture;
use crate::{BoxError, ErrorCode, Fault};

/// Fault with the code's default message and a simplified stack.
pub fn new(code: &ErrorCode) -> Fault {
    Fault::assemble(code, code.message().to_owned(), None, Capture::Simplified)
}

/// Like [`new`] without stack capture.
pub fn fast_new(code: &ErrorCode) -> Fault {
    Fault::assemble(code, code.message().to_owned(), None, Capture::Skip)
}

/// Fault with a formatted message and a simplified stack.
///
/// ```
/// use faultline_error::{catalog, newf};
///
/// let err = newf(&catalog::NOT_FOUND, format_args!("order {} not found", 17));
/// assert_eq!(err.message(), "order 17 not found");
/// ```
pub fn newf(code: &ErrorCode, args: fmt::Arguments<'_>) -> Fault {
    Fault::assemble(code, args.to_string(), None, Capture::Simplified)
}

/// Like [`newf`] without stack capture.
pub fn fast_newf(code: &ErrorCode, args: fmt::Arguments<'_>) -> Fault {
    Fault::assemble(code, args.to_string(), None, Capture::Skip)
}

/// Wrap `err` under `code`.
///
/// If `err` already is a [`Fault`], or has one anywhere in its
/// [`source`](std::error::Error::source) chain, that fault is returned
/// instead and `code` is ignored.
pub fn wrap(err: impl Into<BoxError>, code: &ErrorCode) -> Fault {
    wrap_with(err.into(), code, || code.message().to_owned(), Capture::Simplified)
}

/// Like [`wrap`] without stack capture.
pub fn fast_wrap(err: impl Into<BoxError>, code: &ErrorCode) -> Fault {
    wrap_with(err.into(), code, || code.message().to_owned(), Capture::Skip)
}

/// Wrap `err` with a message derived from the code's default message.
///
/// `format` receives [`ErrorCode::message`] and returns the message of the
/// new fault. The same pass-through rules as [`wrap`] apply; `format` is
/// not called when an existing fault is returned.
///
/// ```
/// use faultline_error::{catalog, wrapf};
///
/// let io = std::io::Error::other("connection reset");
/// let err = wrapf(io, &catalog::TIMEOUT, |default| format!("{default} (payments)"));
/// assert_eq!(err.to_string(), "Request Timeout (payments): connection reset");
/// ```
pub fn wrapf(
    err: impl Into<BoxError>,
    code: &ErrorCode,
    format: impl FnOnce(&str) -> String,
) -> Fault {
    wrap_with(err.into(), code, || format(code.message()), Capture::Simplified)
}

/// Like [`wrapf`] without stack capture.
pub fn fast_wrapf(
    err: impl Into<BoxError>,
    code: &ErrorCode,
    format: impl FnOnce(&str) -> String,
) -> Fault {
    wrap_with(err.into(), code, || format(code.message()), Capture::Skip)
}

fn wrap_with(
    err: BoxError,
    code: &ErrorCode,
    message: impl FnOnce() -> String,
    capture: Capture,
) -> Fault {
    match WrapTarget::classify(err) {
        WrapTarget::Existing(fault) => {
            trace!(code = fault.code(), "wrap target already carries a fault");
            fault
        }
        WrapTarget::Foreign(cause) => Fault::assemble(code, message(), Some(cause), capture),
    }
}

// ---------------------------------------------------------------------------
// Result extension
// ---------------------------------------------------------------------------

/// Wrapping on `Result`: `Ok` values pass through untouched, errors go
/// through the matching wrap function.
///
/// ```
/// use faultline_error::{catalog, WrapErr};
///
/// fn read() -> Result<u32, std::io::Error> {
///     Err(std::io::Error::other("eof"))
/// }
///
/// let err = read().wrap_err(&catalog::INTERNAL).unwrap_err();
/// assert_eq!(err.to_string(), "Internal Server Error: eof");
/// assert_eq!(Ok::<_, std::io::Error>(5).wrap_err(&catalog::INTERNAL).unwrap(), 5);
/// ```
pub trait WrapErr<T> {
    /// See [`wrap`].
    fn wrap_err(self, code: &ErrorCode) -> Result<T, Fault>;

    /// See [`fast_wrap`].
    fn fast_wrap_err(self, code: &ErrorCode) -> Result<T, Fault>;

    /// See [`wrapf`].
    fn wrapf_err(self, code: &ErrorCode, format: impl FnOnce(&str) -> String)
    -> Result<T, Fault>;

    /// See [`fast_wrapf`].
    fn fast_wrapf_err(
        self,
        code: &ErrorCode,
        format: impl FnOnce(&str) -> String,
    ) -> Result<T, Fault>;
}

impl<T, E> WrapErr<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn wrap_err(self, code: &ErrorCode) -> Result<T, Fault> {
        self.map_err(|e| wrap(e, code))
    }

    fn fast_wrap_err(self, code: &ErrorCode) -> Result<T, Fault> {
        self.map_err(|e| fast_wrap(e, code))
    }

    fn wrapf_err(
        self,
        code: &ErrorCode,
        format: impl FnOnce(&str) -> String,
    ) -> Result<T, Fault> {
        self.map_err(|e| wrapf(e, code, format))
    }

    fn fast_wrapf_err(
        self,
        code: &ErrorCode,
        format: impl FnOnce(&str) -> String,
    ) -> Result<T, Fault> {
        self.map_err(|e| fast_wrapf(e, code, format))
    }
}
