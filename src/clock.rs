// src/clock.rs

// clock abstraction used for every time read in the limiter

// dependencies
use std::time::Instant;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns a monotonic timestamp in nanoseconds as a u64.
/// Only differences between two readings are meaningful, so the origin is up to the implementor.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// SystemClock implementation backed by `std::time::Instant`.
/// Readings are nanoseconds elapsed since the clock was created.
/// Monotonic, so wall-clock adjustments never shorten or extend a window.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // u64 nanoseconds covers ~584 years of uptime
        self.origin.elapsed().as_nanos() as u64
    }
}
