// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz FaultlineConfig TOML parsing and validation.
//!
//! Feeds arbitrary byte strings through `parse_toml` and `validate_config`,
//! verifying:
//! 1. `parse_toml` never panics on arbitrary input.
//! 2. Successfully parsed configs can be validated without panics.
//! 3. Round-trip: serialize back to TOML and re-parse produces the same config.
//! 4. Merging with itself is the identity.
#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1: parse_toml never panics ---
    let config = match faultline_config::parse_toml(s) {
        Ok(c) => c,
        Err(_) => return,
    };

    // --- Property 2: validate_config never panics ---
    match faultline_config::validate_config(&config) {
        Ok(warnings) => {
            for w in &warnings {
                let _ = format!("{w}");
            }
        }
        Err(e) => {
            let _ = format!("{e}");
        }
    }
    let _ = config.effective_stack_depth();
    let _ = config.effective_full_stack_depth();

    // --- Property 3: round-trip through TOML serialization ---
    if let Ok(toml_str) = toml::to_string(&config) {
        if let Ok(rt) = faultline_config::parse_toml(&toml_str) {
            assert_eq!(config, rt, "TOML round-trip must be lossless");
        }
    }

    // --- Property 4: self-merge is identity ---
    let merged = faultline_config::merge_configs(config.clone(), config.clone());
    assert_eq!(merged.capture_stack, config.capture_stack);
    assert_eq!(merged.stack_depth, config.stack_depth);
    assert_eq!(merged.full_stack_depth, config.full_stack_depth);
});
