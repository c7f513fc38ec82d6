// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for faultline.
//!
//! [`FaultlineConfig`] controls how errors capture call stacks: whether
//! capture happens at all, how deep simplified and full reports go, and
//! which extra frames are filtered out. Every field is optional; the
//! `effective_*` accessors resolve unset fields to the built-in defaults.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while loading, validating or installing a config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },

    /// A process-wide configuration has already been installed.
    #[error("a faultline config is already installed")]
    AlreadyInstalled,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `stack_depth = 0` was given; the capture default applies instead.
    ZeroStackDepth {
        /// Depth that will be used.
        effective: usize,
    },
    /// The simplified depth exceeds the full-capture frame bound.
    DepthExceedsFullBound {
        /// Simplified depth.
        stack_depth: usize,
        /// Full-capture bound.
        full_stack_depth: usize,
    },
    /// Stack capture is disabled for every constructor.
    CaptureDisabled,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::ZeroStackDepth { effective } => {
                write!(f, "stack_depth is 0; using {effective}")
            }
            ConfigWarning::DepthExceedsFullBound {
                stack_depth,
                full_stack_depth,
            } => write!(
                f,
                "stack_depth {stack_depth} exceeds full_stack_depth {full_stack_depth}"
            ),
            ConfigWarning::CaptureDisabled => {
                f.write_str("stack capture disabled; errors carry no stack trace")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Simplified depth used by the plain constructors when unset.
pub const DEFAULT_STACK_DEPTH: usize = 6;

/// Depth substituted when `stack_depth` is `0`.
pub const ZERO_DEPTH_FALLBACK: usize = 8;

/// Full-capture frame bound when unset.
pub const DEFAULT_FULL_STACK_DEPTH: usize = 32;

/// Largest accepted value for either depth.
pub const MAX_DEPTH: usize = 128;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Stack-capture settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct FaultlineConfig {
    /// Capture stacks in the non-fast constructors (default `true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_stack: Option<bool>,

    /// Maximum informative frames in a simplified report (default 6).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_depth: Option<usize>,

    /// Maximum frames in a full report produced by the builder (default 32).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_stack_depth: Option<usize>,

    /// Extra substrings; frames whose path or function contains one are
    /// left out of simplified reports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_frames: Vec<String>,
}

impl FaultlineConfig {
    /// Whether the non-fast constructors capture a stack.
    pub fn capture_enabled(&self) -> bool {
        self.capture_stack.unwrap_or(true)
    }

    /// Simplified depth after defaulting.
    pub fn effective_stack_depth(&self) -> usize {
        match self.stack_depth {
            None => DEFAULT_STACK_DEPTH,
            Some(0) => ZERO_DEPTH_FALLBACK,
            Some(d) => d,
        }
    }

    /// Full-capture bound after defaulting.
    pub fn effective_full_stack_depth(&self) -> usize {
        self.full_stack_depth.unwrap_or(DEFAULT_FULL_STACK_DEPTH)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`FaultlineConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`FaultlineConfig::default()`].
pub fn load_config(path: Option<&Path>) -> Result<FaultlineConfig, ConfigError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)
        }
        None => Ok(FaultlineConfig::default()),
    }
}

/// Parse a TOML string into a [`FaultlineConfig`].
pub fn parse_toml(content: &str) -> Result<FaultlineConfig, ConfigError> {
    toml::from_str::<FaultlineConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Out-of-range depths and empty frame exclusions are hard errors and come
/// back as [`ConfigError::ValidationError`]; soft issues come back as
/// warnings.
pub fn validate_config(config: &FaultlineConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    match config.stack_depth {
        Some(0) => warnings.push(ConfigWarning::ZeroStackDepth {
            effective: ZERO_DEPTH_FALLBACK,
        }),
        Some(d) if d > MAX_DEPTH => {
            errors.push(format!("stack_depth {d} out of range (0..={MAX_DEPTH})"));
        }
        _ => {}
    }

    if let Some(d) = config.full_stack_depth {
        if d == 0 || d > MAX_DEPTH {
            errors.push(format!(
                "full_stack_depth {d} out of range (1..={MAX_DEPTH})"
            ));
        }
    }

    for (idx, pattern) in config.exclude_frames.iter().enumerate() {
        if pattern.trim().is_empty() {
            errors.push(format!("exclude_frames[{idx}] must not be empty"));
        }
    }

    let stack_depth = config.effective_stack_depth();
    let full_stack_depth = config.effective_full_stack_depth();
    if errors.is_empty() && stack_depth > full_stack_depth {
        warnings.push(ConfigWarning::DepthExceedsFullBound {
            stack_depth,
            full_stack_depth,
        });
    }

    if !config.capture_enabled() {
        warnings.push(ConfigWarning::CaptureDisabled);
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
///
/// Frame exclusions are combined; duplicates are kept once.
pub fn merge_configs(base: FaultlineConfig, overlay: FaultlineConfig) -> FaultlineConfig {
    let mut exclude_frames = base.exclude_frames;
    for pattern in overlay.exclude_frames {
        if !exclude_frames.contains(&pattern) {
            exclude_frames.push(pattern);
        }
    }
    FaultlineConfig {
        capture_stack: overlay.capture_stack.or(base.capture_stack),
        stack_depth: overlay.stack_depth.or(base.stack_depth),
        full_stack_depth: overlay.full_stack_depth.or(base.full_stack_depth),
        exclude_frames,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
