// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-kind shortcuts over the [`catalog`] codes.
//!
//! Every kind comes in six flavours:
//!
//! | function | message | stack | metadata |
//! |----------|---------|-------|----------|
//! | `kind()` | default | simplified | none |
//! | `kind_fast()` | default | none | none |
//! | `kind_fmt(args)` | formatted | simplified | none |
//! | `kind_fmt_fast(args)` | formatted | none | none |
//! | `kind_with_meta(map, args)` | formatted | simplified | `map` |
//! | `kind_with_meta_fast(map, args)` | formatted | none | `map` |
//!
//! ```
//! use faultline_error::convenience::not_found_with_meta;
//!
//! let err = not_found_with_meta([("order_id", 17)], format_args!("order {} not found", 17));
//! assert_eq!(err.http_status(), 404);
//! assert_eq!(err.metadata().unwrap()["order_id"], 17);
//! ```

use serde::Serialize;
use std::fmt;

use crate::{Fault, catalog, fast_new, fast_newf, new, newf};

macro_rules! shortcuts {
    ($(
        $code:path => $plain:ident, $fast:ident, $fmt:ident, $fmt_fast:ident,
            $meta:ident, $meta_fast:ident;
    )*) => {$(
        #[doc = concat!("[`new`] with [`", stringify!($code), "`].")]
        pub fn $plain() -> Fault {
            new(&$code)
        }

        #[doc = concat!("[`fast_new`] with [`", stringify!($code), "`].")]
        pub fn $fast() -> Fault {
            fast_new(&$code)
        }

        #[doc = concat!("[`newf`] with [`", stringify!($code), "`].")]
        pub fn $fmt(args: fmt::Arguments<'_>) -> Fault {
            newf(&$code, args)
        }

        #[doc = concat!("[`fast_newf`] with [`", stringify!($code), "`].")]
        pub fn $fmt_fast(args: fmt::Arguments<'_>) -> Fault {
            fast_newf(&$code, args)
        }

        #[doc = concat!("[`newf`] with [`", stringify!($code), "`] and metadata.")]
        pub fn $meta<K, V>(
            metadata: impl IntoIterator<Item = (K, V)>,
            args: fmt::Arguments<'_>,
        ) -> Fault
        where
            K: Into<String>,
            V: Serialize,
        {
            newf(&$code, args).with_metadata_map(metadata)
        }

        #[doc = concat!("[`fast_newf`] with [`", stringify!($code), "`] and metadata.")]
        pub fn $meta_fast<K, V>(
            metadata: impl IntoIterator<Item = (K, V)>,
            args: fmt::Arguments<'_>,
        ) -> Fault
        where
            K: Into<String>,
            V: Serialize,
        {
            fast_newf(&$code, args).with_metadata_map(metadata)
        }
    )*};
}

shortcuts! {
    catalog::INTERNAL => internal, internal_fast, internal_fmt, internal_fmt_fast,
        internal_with_meta, internal_with_meta_fast;
    catalog::TIMEOUT => timeout, timeout_fast, timeout_fmt, timeout_fmt_fast,
        timeout_with_meta, timeout_with_meta_fast;
    catalog::NOT_FOUND => not_found, not_found_fast, not_found_fmt, not_found_fmt_fast,
        not_found_with_meta, not_found_with_meta_fast;
    catalog::BAD_REQUEST => bad_request, bad_request_fast, bad_request_fmt, bad_request_fmt_fast,
        bad_request_with_meta, bad_request_with_meta_fast;
    catalog::UNAUTHORIZED => unauthorized, unauthorized_fast, unauthorized_fmt,
        unauthorized_fmt_fast, unauthorized_with_meta, unauthorized_with_meta_fast;
    catalog::FORBIDDEN => forbidden, forbidden_fast, forbidden_fmt, forbidden_fmt_fast,
        forbidden_with_meta, forbidden_with_meta_fast;
    catalog::CONFLICT => conflict, conflict_fast, conflict_fmt, conflict_fmt_fast,
        conflict_with_meta, conflict_with_meta_fast;
    catalog::RATE_LIMIT => rate_limit, rate_limit_fast, rate_limit_fmt, rate_limit_fmt_fast,
        rate_limit_with_meta, rate_limit_with_meta_fast;
}
