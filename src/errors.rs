// src/errors.rs

// error handling for the attempt limiter type

/// Error type for AttemptLimiter configuration issues.
///
/// Only construction can fail; admission decisions and recording are infallible.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AttemptLimiterError {
    /// max_attempts == 0
    #[error("Max attempts must be positive")]
    InvalidMaxAttempts,
    /// window_seconds == 0, or too long to express in nanoseconds
    #[error("Window length must be positive and at most u64::MAX nanoseconds")]
    InvalidWindow,
    /// sweep_interval_seconds == 0
    #[error("Sweep interval must be positive")]
    InvalidSweepInterval,
}
