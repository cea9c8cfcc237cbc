//! Exporter configuration.

use serde::{Deserialize, Serialize};

/// What to do when zero-height preparation hits a fatal error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltPolicy {
    /// Log the error and panic, halting the process.
    #[default]
    Panic,
    /// Return the error to the caller as [`crate::ExportError::Fatal`].
    Propagate,
}

/// Configuration for the [`crate::ExportCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Reaction to invariant violations and signing-info persistence failures.
    pub halt_policy: HaltPolicy,
    /// Whether to run set-level validator checks (address uniqueness, total
    /// power overflow). Non-negative power and non-empty addresses are
    /// enforced either way.
    pub validate_validator_set: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            halt_policy: HaltPolicy::Panic,
            validate_validator_set: true,
        }
    }
}

impl ExportConfig {
    /// Config that returns fatal errors instead of panicking.
    pub fn propagating() -> Self {
        Self {
            halt_policy: HaltPolicy::Propagate,
            ..Self::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
