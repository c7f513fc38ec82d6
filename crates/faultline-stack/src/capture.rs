// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live stack walking.

use tracing::trace;

use crate::frame::{Frame, FrameFilter};
use crate::{FULL_DEPTH, render_full, render_simplified, simplify_function_name};

/// Upper bound on raw frames resolved per walk.
const MAX_RAW_FRAMES: usize = 128;

/// Resolve the current stack, innermost first, without the frames of the
/// capture machinery (the `backtrace` crate and this crate).
#[inline(never)]
fn walk() -> Vec<Frame> {
    let mut frames = Vec::new();
    backtrace::trace(|raw| {
        let mut resolved = false;
        backtrace::resolve_frame(raw, |symbol| {
            resolved = true;
            let file = symbol.filename().map(|p| p.display().to_string());
            frames.push(Frame {
                function: symbol
                    .name()
                    .map(|n| format!("{n:#}"))
                    .unwrap_or_else(|| crate::frame::UNKNOWN.to_string()),
                file,
                line: symbol.lineno(),
            });
        });
        if !resolved {
            frames.push(Frame::unresolved());
        }
        frames.len() < MAX_RAW_FRAMES
    });

    let machinery = frames.iter().take_while(|f| f.is_machinery()).count();
    frames.drain(..machinery);
    if frames.is_empty() {
        trace!("stack walk produced no frames");
    }
    frames
}

/// Capture a full report of the current stack.
///
/// Leading frames from this library's own source are dropped, then `skip`
/// further innermost frames. At most [`FULL_DEPTH`] frames are rendered.
pub fn capture_stack_trace(skip: usize) -> Option<String> {
    capture_stack_trace_with_depth(skip, FULL_DEPTH)
}

/// Like [`capture_stack_trace`] with an explicit frame bound.
///
/// A `depth` of `0` falls back to [`FULL_DEPTH`].
pub fn capture_stack_trace_with_depth(skip: usize, depth: usize) -> Option<String> {
    let depth = if depth == 0 { FULL_DEPTH } else { depth };
    let frames: Vec<Frame> = walk()
        .into_iter()
        .skip_while(Frame::is_library)
        .skip(skip)
        .take(depth)
        .collect();
    render_full(&frames)
}

/// Capture a simplified report of the current stack.
///
/// `skip` innermost frames are discarded, uninformative frames are filtered
/// out and the remaining frames are bounded by `max_depth` (`0` means
/// [`DEFAULT_SIMPLIFIED_DEPTH`](crate::DEFAULT_SIMPLIFIED_DEPTH)).
pub fn simplified_stack_trace(skip: usize, max_depth: usize) -> Option<String> {
    simplified_stack_trace_with(skip, max_depth, &FrameFilter::default())
}

/// Like [`simplified_stack_trace`] with a caller-supplied filter.
pub fn simplified_stack_trace_with(
    skip: usize,
    max_depth: usize,
    filter: &FrameFilter,
) -> Option<String> {
    let frames = walk();
    render_simplified(frames.iter().skip(skip), max_depth, filter)
}

/// Simplified name of the function that called this one, or `"unknown"`.
#[inline(never)]
pub fn current_function_name() -> String {
    walk()
        .first()
        .filter(|f| f.function != crate::frame::UNKNOWN)
        .map(|f| simplify_function_name(&f.function))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_skips_machinery() {
        let frames = walk();
        assert!(frames.iter().take(1).all(|f| !f.is_machinery()));
    }

    #[test]
    fn full_capture_has_header() {
        // Runtime frames are kept in full reports, so even a unit test has
        // something to show when symbols resolve.
        if let Some(trace) = capture_stack_trace(0) {
            assert!(trace.starts_with(crate::FULL_HEADER));
        }
    }

    #[test]
    fn full_capture_depth_is_bounded() {
        if let Some(trace) = capture_stack_trace_with_depth(0, 2) {
            let frames = trace.lines().skip(1).filter(|l| !l.starts_with("    ")).count();
            assert!(frames <= 2);
        }
    }

    #[test]
    fn huge_skip_yields_none() {
        assert!(capture_stack_trace(MAX_RAW_FRAMES + 1).is_none());
        assert!(simplified_stack_trace(MAX_RAW_FRAMES + 1, 8).is_none());
    }
}
