// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process-wide capture settings.
//!
//! A [`FaultlineConfig`] can be installed once per process. Until then (or
//! if never installed) every constructor uses the defaults.

use faultline_config::{ConfigError, ConfigWarning, FaultlineConfig, validate_config};
use faultline_stack::{FrameFilter, capture_stack_trace_with_depth, simplified_stack_trace_with};
use std::sync::{LazyLock, OnceLock};
use tracing::debug;

struct Settings {
    config: FaultlineConfig,
    filter: FrameFilter,
}

impl From<FaultlineConfig> for Settings {
    fn from(config: FaultlineConfig) -> Self {
        let filter = FrameFilter::default().with_exclusions(config.exclude_frames.iter().cloned());
        Self { config, filter }
    }
}

static INSTALLED: OnceLock<Settings> = OnceLock::new();
static DEFAULTS: LazyLock<Settings> = LazyLock::new(|| FaultlineConfig::default().into());

fn settings() -> &'static Settings {
    INSTALLED.get().unwrap_or(&DEFAULTS)
}

/// Validate and install the process-wide configuration.
///
/// Returns the advisory warnings produced by validation. Fails with
/// [`ConfigError::ValidationError`] for an invalid config and with
/// [`ConfigError::AlreadyInstalled`] on a second call.
pub fn install_config(config: FaultlineConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let warnings = validate_config(&config)?;
    INSTALLED
        .set(config.into())
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    debug!(warnings = warnings.len(), "installed faultline config");
    Ok(warnings)
}

/// The installed configuration, or the defaults when none is installed.
pub fn config() -> &'static FaultlineConfig {
    &settings().config
}

/// How a constructor records the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capture {
    /// Fast mode: nothing is captured.
    Skip,
    /// Filtered, depth-bounded report.
    Simplified,
    /// Every frame up to the full bound.
    Full,
}

impl Capture {
    pub(crate) fn run(self) -> Option<String> {
        if self == Capture::Skip {
            return None;
        }
        let settings = settings();
        if !settings.config.capture_enabled() {
            return None;
        }
        match self {
            Capture::Skip => None,
            Capture::Simplified => simplified_stack_trace_with(
                0,
                settings.config.effective_stack_depth(),
                &settings.filter,
            ),
            Capture::Full => {
                capture_stack_trace_with_depth(0, settings.config.effective_full_stack_depth())
            }
        }
    }
}
