// SPDX-License-Identifier: MIT OR Apache-2.0
//! Call-stack capture for faultline errors.
//!
//! Two report flavours are produced from a live stack walk:
//!
//! * [`capture_stack_trace`] renders every frame (bounded to
//!   [`FULL_DEPTH`]) with its fully qualified function name and source
//!   location.
//! * [`simplified_stack_trace`] drops uninformative frames (runtime,
//!   closure shims, this library, vendored dependencies) *before* applying
//!   the depth budget, and shortens names and paths so the report stays
//!   terminal-readable.
//!
//! Both walk the stack synchronously and retain nothing after returning.
//! When no frame survives, the result is `None`.
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod capture;
mod frame;

pub use capture::{
    capture_stack_trace, capture_stack_trace_with_depth, current_function_name,
    simplified_stack_trace, simplified_stack_trace_with,
};
pub use frame::{Frame, FrameFilter, simplify_file_path, simplify_function_name};

/// Frame bound for full captures.
pub const FULL_DEPTH: usize = 32;

/// Depth used by simplified captures when the caller passes `0`.
pub const DEFAULT_SIMPLIFIED_DEPTH: usize = 8;

/// Header line of a full report.
pub const FULL_HEADER: &str = "Stack Trace:\n";

/// Header line of a simplified report.
pub const SIMPLIFIED_HEADER: &str = "Simplified Stack:\n";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render frames as a full report, one two-line block per frame.
///
/// ```
/// use faultline_stack::{Frame, render_full};
///
/// let frames = [Frame::new("app::handler::create_user", Some("src/handler.rs"), Some(42))];
/// assert_eq!(
///     render_full(&frames).as_deref(),
///     Some("Stack Trace:\n  app::handler::create_user\n    src/handler.rs:42\n"),
/// );
/// ```
pub fn render_full(frames: &[Frame]) -> Option<String> {
    if frames.is_empty() {
        return None;
    }
    let mut out = String::from(FULL_HEADER);
    for frame in frames {
        out.push_str("  ");
        out.push_str(&frame.function);
        out.push_str("\n    ");
        out.push_str(frame.file.as_deref().unwrap_or(frame::UNKNOWN));
        out.push(':');
        out.push_str(&frame.line.unwrap_or(0).to_string());
        out.push('\n');
    }
    Some(out)
}

/// Render the informative subset of `frames` as a simplified report.
///
/// Frames rejected by `filter` are dropped first; `max_depth` then bounds
/// the number of *kept* frames (`0` means [`DEFAULT_SIMPLIFIED_DEPTH`]).
pub fn render_simplified<'a>(
    frames: impl IntoIterator<Item = &'a Frame>,
    max_depth: usize,
    filter: &FrameFilter,
) -> Option<String> {
    let max_depth = if max_depth == 0 {
        DEFAULT_SIMPLIFIED_DEPTH
    } else {
        max_depth
    };

    let mut out = String::from(SIMPLIFIED_HEADER);
    let mut kept = 0;
    for frame in frames
        .into_iter()
        .filter(|f| filter.includes(f))
        .take(max_depth)
    {
        out.push_str("  ");
        out.push_str(&simplify_function_name(&frame.function));
        out.push_str(" (");
        out.push_str(&simplify_file_path(
            frame.file.as_deref().unwrap_or(frame::UNKNOWN),
        ));
        out.push(':');
        out.push_str(&frame.line.unwrap_or(0).to_string());
        out.push_str(")\n");
        kept += 1;
    }

    (kept > 0).then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_frame(function: &str, file: &str, line: u32) -> Frame {
        Frame::new(function, Some(file), Some(line))
    }

    fn runtime_frame() -> Frame {
        Frame::new(
            "std::rt::lang_start_internal",
            Some("/rustc/90b35a6239c3d8bdabc530a6a0816f7ff89a0aaf/library/std/src/rt.rs"),
            Some(148),
        )
    }

    #[test]
    fn full_report_empty_is_none() {
        assert!(render_full(&[]).is_none());
    }

    #[test]
    fn full_report_lists_every_frame() {
        let frames = [
            user_frame("app::service::register", "/home/ci/app/src/service.rs", 10),
            runtime_frame(),
        ];
        let out = render_full(&frames).unwrap();
        assert!(out.starts_with(FULL_HEADER));
        assert!(out.contains("  app::service::register\n    /home/ci/app/src/service.rs:10\n"));
        assert!(out.contains("std::rt::lang_start_internal"));
    }

    #[test]
    fn full_report_unknown_location() {
        let out = render_full(&[Frame::new("mystery", None, None)]).unwrap();
        assert_eq!(out, "Stack Trace:\n  mystery\n    <unknown>:0\n");
    }

    #[test]
    fn simplified_report_format() {
        let frames = [user_frame(
            "app::service::register",
            "/home/ci/app/src/service.rs",
            10,
        )];
        let out = render_simplified(&frames, 4, &FrameFilter::default()).unwrap();
        assert_eq!(out, "Simplified Stack:\n  register (src/service.rs:10)\n");
    }

    #[test]
    fn simplified_filters_before_depth_limit() {
        let frames = vec![
            runtime_frame(),
            runtime_frame(),
            user_frame("app::a", "src/a.rs", 1),
            runtime_frame(),
            user_frame("app::b", "src/b.rs", 2),
            user_frame("app::c", "src/c.rs", 3),
        ];
        let out = render_simplified(&frames, 2, &FrameFilter::default()).unwrap();
        let lines: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(lines, vec!["  a (src/a.rs:1)", "  b (src/b.rs:2)"]);
    }

    #[test]
    fn simplified_zero_depth_uses_default() {
        let frames: Vec<Frame> = (0..20)
            .map(|i| user_frame(&format!("app::f{i}"), "src/lib.rs", i))
            .collect();
        let out = render_simplified(&frames, 0, &FrameFilter::default()).unwrap();
        assert_eq!(out.lines().count(), 1 + DEFAULT_SIMPLIFIED_DEPTH);
    }

    #[test]
    fn simplified_all_filtered_is_none() {
        let frames = [runtime_frame(), Frame::new("no_file", None, None)];
        assert!(render_simplified(&frames, 8, &FrameFilter::default()).is_none());
    }

    #[test]
    fn simplified_honours_extra_exclusions() {
        let frames = [
            user_frame("generated::glue", "gen/glue.rs", 7),
            user_frame("app::main", "src/main.rs", 3),
        ];
        let filter = FrameFilter::default().with_exclusions(["gen/"]);
        let out = render_simplified(&frames, 8, &filter).unwrap();
        assert!(!out.contains("glue"));
        assert!(out.contains("main (src/main.rs:3)"));
    }
}
