// src/config.rs

//! Configuration types for the attempt limiter

// dependencies
use crate::errors::AttemptLimiterError;
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_WINDOW_SECONDS: u64 = 900;
const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 300;

// longest window that still fits in u64 nanoseconds
pub(crate) const MAX_WINDOW_SECONDS: u64 = u64::MAX / 1_000_000_000;

/// Configuration for attempt limiter behavior.
///
/// Deserializes with per-field defaults, so a host config file only needs to
/// name the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptLimiterConfig {
    /// Failures allowed per window before the key is hard-blocked.
    #[serde(default = "default_max_attempts")]
    pub(crate) max_attempts: u32,
    /// Window length, anchored to the first failure.
    #[serde(default = "default_window_seconds")]
    pub(crate) window_seconds: u64,
    /// Cadence of the background sweep.
    #[serde(default = "default_sweep_interval_seconds")]
    pub(crate) sweep_interval_seconds: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_window_seconds() -> u64 {
    DEFAULT_WINDOW_SECONDS
}

fn default_sweep_interval_seconds() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECONDS
}

impl Default for AttemptLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }
}

impl AttemptLimiterConfig {
    /// Create a new configuration with cap and window settings.
    /// The sweep interval keeps its default.
    pub fn new(max_attempts: u32, window_seconds: u64) -> Self {
        Self {
            max_attempts,
            window_seconds,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }

    /// Builder-style: set failures allowed per window
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Builder-style: set window length in seconds
    pub fn window_seconds(mut self, window_seconds: u64) -> Self {
        self.window_seconds = window_seconds;
        self
    }

    /// Builder-style: set sweep cadence in seconds
    pub fn sweep_interval_seconds(mut self, sweep_interval_seconds: u64) -> Self {
        self.sweep_interval_seconds = sweep_interval_seconds;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AttemptLimiterError> {
        if self.max_attempts == 0 {
            return Err(AttemptLimiterError::InvalidMaxAttempts);
        }
        if self.window_seconds == 0 || self.window_seconds > MAX_WINDOW_SECONDS {
            return Err(AttemptLimiterError::InvalidWindow);
        }
        if self.sweep_interval_seconds == 0 {
            return Err(AttemptLimiterError::InvalidSweepInterval);
        }
        Ok(())
    }
}
