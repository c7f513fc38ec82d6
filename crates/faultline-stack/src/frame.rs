// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stack frames, name/path simplification and frame filtering.

pub(crate) const UNKNOWN: &str = "<unknown>";

/// Path fragments identifying the Rust runtime and standard library.
const RUNTIME_PATHS: &[&str] = &[
    "/rustc/",
    "library/std/",
    "library/core/",
    "library/alloc/",
    "library/test/",
    "library/panic_unwind/",
];

/// Symbol prefixes of runtime frames that may carry no useful path.
const RUNTIME_SYMBOLS: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "test::",
    "panic_unwind::",
    "__rust",
    "rust_begin_unwind",
];

/// C runtime entry points and thread trampolines.
const RUNTIME_EXACT: &[&str] = &[
    "main",
    "_start",
    "__libc_start_main",
    "__libc_start_call_main",
    "start_thread",
    "clone",
    "clone3",
    "__clone",
];

/// Dynamic-dispatch and closure-call shims.
const SHIM_SYMBOLS: &[&str] = &[" as core::ops::function::", " as std::ops::function::"];

/// Source directories of this library.
const LIBRARY_PATHS: &[&str] = &["faultline-stack/src/", "faultline-error/src/"];

/// Symbol prefixes of this library.
const LIBRARY_SYMBOLS: &[&str] = &["faultline_stack::", "faultline_error::"];

/// Locations of third-party sources pulled in by cargo.
const VENDORED_PATHS: &[&str] = &["registry/src/", "/.cargo/git/", "/vendor/"];

/// A single resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function name without the symbol hash.
    pub function: String,
    /// Source file, when debug info is available.
    pub file: Option<String>,
    /// Source line, when debug info is available.
    pub line: Option<u32>,
}

impl Frame {
    /// Create a frame from its parts.
    pub fn new(function: impl Into<String>, file: Option<&str>, line: Option<u32>) -> Self {
        Self {
            function: function.into(),
            file: file.map(str::to_owned),
            line,
        }
    }

    pub(crate) fn unresolved() -> Self {
        Self::new(UNKNOWN, None, None)
    }

    fn symbol(&self) -> &str {
        self.function.trim_start_matches('<')
    }

    fn normalized_file(&self) -> Option<String> {
        self.file.as_deref().map(|f| f.replace('\\', "/"))
    }

    /// Whether the frame belongs to the capture machinery itself.
    pub(crate) fn is_machinery(&self) -> bool {
        let symbol = self.symbol();
        symbol.starts_with("backtrace::") || symbol.starts_with("faultline_stack::")
    }

    /// Whether the frame belongs to this library's own source.
    pub(crate) fn is_library(&self) -> bool {
        let symbol = self.symbol();
        if LIBRARY_SYMBOLS.iter().any(|p| symbol.starts_with(p)) {
            return true;
        }
        self.normalized_file()
            .is_some_and(|f| LIBRARY_PATHS.iter().any(|p| f.contains(p)))
    }

    fn is_runtime(&self) -> bool {
        let symbol = self.symbol();
        if RUNTIME_EXACT.contains(&symbol)
            || RUNTIME_SYMBOLS.iter().any(|p| symbol.starts_with(p))
            || SHIM_SYMBOLS.iter().any(|s| self.function.contains(s))
        {
            return true;
        }
        self.normalized_file()
            .is_some_and(|f| RUNTIME_PATHS.iter().any(|p| f.contains(p)))
    }

    fn is_vendored(&self) -> bool {
        self.normalized_file()
            .is_some_and(|f| VENDORED_PATHS.iter().any(|p| f.contains(p)))
            || self.function.contains("vendor/")
    }
}

// ---------------------------------------------------------------------------
// FrameFilter
// ---------------------------------------------------------------------------

/// Decides which frames are informative enough for a simplified report.
///
/// The built-in rules drop frames without a source file, runtime and
/// standard-library frames, closure-call shims, this library's own frames
/// and vendored dependencies. Extra substrings can be added with
/// [`FrameFilter::with_exclusions`]; they are matched against both the
/// function name and the file path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameFilter {
    exclusions: Vec<String>,
}

impl FrameFilter {
    /// Add extra exclusion substrings. Empty entries are ignored.
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(
            exclusions
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty()),
        );
        self
    }

    /// Extra exclusion substrings configured on this filter.
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// Returns `true` when `frame` should appear in a simplified report.
    pub fn includes(&self, frame: &Frame) -> bool {
        let Some(file) = frame.normalized_file() else {
            return false;
        };
        if frame.is_runtime() || frame.is_library() || frame.is_vendored() {
            return false;
        }
        !self
            .exclusions
            .iter()
            .any(|e| file.contains(e.as_str()) || frame.function.contains(e.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Simplification
// ---------------------------------------------------------------------------

/// Split a path on top-level `::`, ignoring separators inside `<...>`.
fn split_path(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&name[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&name[start..]);
    segments
}

/// Reduce a qualified function name to its last path segment.
///
/// Compiler-generated trailing segments such as `{{closure}}` keep the
/// function they belong to.
///
/// ```
/// use faultline_stack::simplify_function_name;
///
/// assert_eq!(simplify_function_name("app::users::create"), "create");
/// assert_eq!(simplify_function_name("app::run::{{closure}}"), "run::{{closure}}");
/// assert_eq!(simplify_function_name("<app::Repo as app::Store>::get"), "get");
/// ```
pub fn simplify_function_name(name: &str) -> String {
    let segments = split_path(name);
    let named = segments
        .iter()
        .rposition(|s| !s.starts_with("{{"))
        .unwrap_or(0);
    segments[named..].join("::")
}

/// Keep only the last two segments of a file path.
///
/// ```
/// use faultline_stack::simplify_file_path;
///
/// assert_eq!(simplify_file_path("/home/ci/app/src/main.rs"), "src/main.rs");
/// assert_eq!(simplify_file_path("main.rs"), "main.rs");
/// ```
pub fn simplify_file_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.len() > 2 {
        parts[parts.len() - 2..].join("/")
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn function_name_plain() {
        assert_eq!(simplify_function_name("main"), "main");
        assert_eq!(simplify_function_name("a::b::c"), "c");
    }

    #[test]
    fn function_name_nested_closures() {
        assert_eq!(
            simplify_function_name("svc::handler::run::{{closure}}::{{closure}}"),
            "run::{{closure}}::{{closure}}"
        );
    }

    #[test]
    fn function_name_generic_impl() {
        assert_eq!(
            simplify_function_name("<alloc::vec::Vec<T> as core::iter::Extend<T>>::extend"),
            "extend"
        );
        assert_eq!(
            simplify_function_name("app::Cache<core::option::Option<u8>>::get"),
            "get"
        );
    }

    #[test]
    fn file_path_windows_separators() {
        assert_eq!(
            simplify_file_path(r"C:\work\app\src\lib.rs"),
            "src/lib.rs"
        );
    }

    #[test]
    fn file_path_short_kept() {
        assert_eq!(simplify_file_path("src/lib.rs"), "src/lib.rs");
        assert_eq!(simplify_file_path("/lib.rs"), "/lib.rs");
    }

    #[test]
    fn filter_drops_frames_without_file() {
        assert!(!FrameFilter::default().includes(&Frame::new("app::run", None, Some(1))));
    }

    #[test]
    fn filter_drops_runtime() {
        let filter = FrameFilter::default();
        let rustc = Frame::new(
            "std::panicking::try",
            Some("/rustc/abc/library/std/src/panicking.rs"),
            Some(10),
        );
        let shim = Frame::new(
            "<F as core::ops::function::FnOnce<()>>::call_once",
            Some("app/src/main.rs"),
            Some(1),
        );
        assert!(!filter.includes(&rustc));
        assert!(!filter.includes(&shim));
    }

    #[test]
    fn filter_drops_library_frames() {
        let filter = FrameFilter::default();
        let by_path = Frame::new(
            "something::else",
            Some("/build/crates/faultline-error/src/builder.rs"),
            Some(3),
        );
        let by_symbol = Frame::new(
            "faultline_error::constructors::new",
            Some("elsewhere.rs"),
            Some(3),
        );
        assert!(!filter.includes(&by_path));
        assert!(!filter.includes(&by_symbol));
    }

    #[test]
    fn filter_drops_vendored() {
        let filter = FrameFilter::default();
        let registry = Frame::new(
            "tokio::runtime::park",
            Some("/home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/tokio-1.0/src/park.rs"),
            Some(9),
        );
        let vendor = Frame::new("dep::f", Some("/repo/vendor/dep/src/lib.rs"), Some(9));
        assert!(!filter.includes(&registry));
        assert!(!filter.includes(&vendor));
    }

    #[test]
    fn filter_keeps_application_frames() {
        let frame = Frame::new("shop::orders::place", Some("src/orders.rs"), Some(88));
        assert!(FrameFilter::default().includes(&frame));
    }

    #[test]
    fn empty_exclusions_ignored() {
        let filter = FrameFilter::default().with_exclusions(["", "gen/"]);
        assert_eq!(filter.exclusions(), ["gen/".to_string()]);
    }

    #[test]
    fn machinery_detection() {
        assert!(Frame::new("backtrace::backtrace::trace", None, None).is_machinery());
        assert!(Frame::new("faultline_stack::capture::walk", None, None).is_machinery());
        assert!(!Frame::new("app::main", None, None).is_machinery());
    }

    proptest! {
        #[test]
        fn simplified_name_is_suffix(segments in prop::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..6)) {
            let name = segments.join("::");
            let simple = simplify_function_name(&name);
            prop_assert!(name.ends_with(&simple));
            prop_assert!(!simple.contains("::"));
        }

        #[test]
        fn simplified_path_has_at_most_two_segments(parts in prop::collection::vec("[a-z]{1,6}", 1..8)) {
            let path = format!("/{}", parts.join("/"));
            let simple = simplify_file_path(&path);
            prop_assert!(path.ends_with(&simple));
            prop_assert!(simple.split('/').count() <= 2);
        }
    }
}
