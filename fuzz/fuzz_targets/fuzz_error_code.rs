// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz ErrorCode deserialization and Fault construction.
//!
//! Verifies:
//! 1. Deserializing arbitrary strings as ErrorCode / ErrType never panics.
//! 2. A Fault built from a decoded code copies its identity.
//! 3. Arbitrary metadata keys and messages never panic.
#![no_main]
use faultline_error::{ErrType, ErrorCode, fast_newf};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1 ---
    if let Ok(t) = s.parse::<ErrType>() {
        assert_eq!(t.as_str(), s);
    }
    let _ = serde_json::from_str::<ErrType>(s);

    if let Ok(code) = serde_json::from_str::<ErrorCode>(s) {
        // --- Property 2 ---
        let fault = fast_newf(&code, format_args!("{s}"));
        assert_eq!(fault.code(), code.code());
        assert_eq!(fault.http_status(), code.http_status());
        assert_eq!(fault.err_type(), code.err_type());
    }

    // --- Property 3 ---
    let fault = fast_newf(&faultline_error::catalog::INTERNAL, format_args!("{s}"))
        .with_metadata(s, s.len());
    assert_eq!(fault.message(), s);
    let _ = fault.to_string();
});
