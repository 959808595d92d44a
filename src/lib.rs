// src/lib.rs

//! # Attempt Limiter
//!
//! Throttles failed logins per client key. Each key gets a hard cap of failures
//! per window plus an exponential cooldown after every failure, and a background
//! sweeper reclaims records whose window has expired.
//!
//! ## Quick Example
//!
//! ```rust
//! use attempt_limiter::{AttemptLimiter, AttemptLimiterConfig, SystemClock};
//!
//! let config = AttemptLimiterConfig::new(5, 900);
//! let limiter: AttemptLimiter = AttemptLimiter::with_config(config, SystemClock::new()).unwrap();
//!
//! let decision = limiter.check("203.0.113.7");
//! if decision.allowed {
//!     // verify credentials, then report the outcome
//!     limiter.record_fail("203.0.113.7");
//! } else {
//!     println!("Too many attempts - retry after {}s", decision.wait_seconds);
//! }
//!
//! // a second attempt right away hits the one-second cooldown
//! assert!(!limiter.check("203.0.113.7").allowed);
//!
//! limiter.record_success("203.0.113.7");
//! assert!(limiter.check("203.0.113.7").allowed);
//! ```
//!
//! Inside a tokio runtime, `Arc<AttemptLimiter>::spawn_sweeper` starts the
//! periodic eviction of expired records.

// private modules
mod clock;
mod config;
mod errors;
mod ledger;
mod limiter;
mod sweeper;

// public API exports
pub use clock::{Clock, SystemClock};
pub use config::AttemptLimiterConfig;
pub use errors::AttemptLimiterError;
pub use limiter::{AttemptDecision, AttemptLimiter, AttemptStatus};
pub use sweeper::SweeperHandle;
