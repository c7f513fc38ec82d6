// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured error values for services.
//!
//! A [`Fault`] carries a stable machine-readable code, a human message, an
//! HTTP status, an [`ErrType`] classification, a UTC timestamp, an optional
//! cause, optional metadata and an optional captured call stack, while
//! still being an ordinary [`std::error::Error`].
//!
//! Faults are built from an [`ErrorCode`] (see [`catalog`] for the
//! predefined ones) through the direct constructors ([`new`], [`newf`]),
//! the wrapping constructors ([`wrap`], [`wrapf`], [`WrapErr`]), the
//! per-kind shortcuts in [`convenience`] or the [`Builder`]. Each capturing
//! constructor has a `fast_` twin that skips stack capture.
//!
//! ```
//! use faultline_error::{catalog, newf, ErrType};
//!
//! let err = newf(&catalog::USERNAME_EXISTED, format_args!("Username '{}' is already taken", "alice"))
//!     .with_metadata("username", "alice");
//!
//! assert_eq!(err.code(), "USERNAME_EXISTED");
//! assert_eq!(err.http_status(), 409);
//! assert_eq!(err.err_type(), ErrType::Conflict);
//! assert_eq!(err.to_string(), "Username 'alice' is already taken");
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
pub mod catalog;
mod code;
mod constructors;
pub mod convenience;
mod fault;
mod kind;
mod pool;
mod settings;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use builder::Builder;
pub use code::ErrorCode;
pub use constructors::{
    WrapErr, fast_new, fast_newf, fast_wrap, fast_wrapf, new, newf, wrap, wrapf,
};
pub use fault::{Fault, find_fault, is_fault};
pub use faultline_config::{ConfigError, ConfigWarning, FaultlineConfig};
pub use kind::{ErrType, UnknownErrType};
pub use pool::{FaultPool, PooledFault};
pub use settings::{config, install_config};

/// Key/value context attached to a [`Fault`].
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Boxed error accepted by the wrapping constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared handle to the cause of a [`Fault`].
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;
