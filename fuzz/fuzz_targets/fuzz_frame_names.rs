// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz frame-name simplification and filtering.
//!
//! Verifies:
//! 1. `simplify_function_name` / `simplify_file_path` never panic.
//! 2. A simplified name is never longer than the input.
//! 3. Simplified paths have at most two segments.
//! 4. Rendering arbitrary frames never panics.
#![no_main]
use arbitrary::Arbitrary;
use faultline_stack::{
    Frame, FrameFilter, render_full, render_simplified, simplify_file_path,
    simplify_function_name,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    frames: Vec<(String, Option<String>, Option<u32>)>,
    exclusions: Vec<String>,
    max_depth: u8,
}

fuzz_target!(|input: Input| {
    let frames: Vec<Frame> = input
        .frames
        .iter()
        .map(|(f, file, line)| Frame::new(f.as_str(), file.as_deref(), *line))
        .collect();

    for frame in &frames {
        // --- Properties 1 & 2 ---
        let name = simplify_function_name(&frame.function);
        assert!(name.len() <= frame.function.len());

        // --- Property 3 ---
        if let Some(file) = &frame.file {
            let short = simplify_file_path(file);
            assert!(short.split('/').count() <= 2, "{short}");
        }
    }

    // --- Property 4 ---
    let filter = FrameFilter::default().with_exclusions(
        input.exclusions.into_iter().filter(|e| !e.is_empty()),
    );
    let _ = render_full(&frames);
    if let Some(report) = render_simplified(&frames, usize::from(input.max_depth), &filter) {
        assert!(report.starts_with(faultline_stack::SIMPLIFIED_HEADER));
    }
});
