// src/limiter.rs

// attempt-limiter: per-key failure tracking with a windowed hard cap and exponential backoff.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::AttemptLimiterConfig;
use crate::errors::AttemptLimiterError;
use crate::ledger::{AttemptLedger, AttemptRecord};
use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;
use tracing::{debug, trace, warn};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// The main AttemptLimiter model.
/// K is the type used to identify clients (e.g., String, IpAddr, etc.).
/// C is the clock type, defaulting to SystemClock.
///
/// Two policies combine into one decision:
/// - a hard cap of `max_attempts` failures per window, the window anchored to the first failure;
/// - a cooldown of `2^(count-1)` seconds after each failure, measured from the latest one.
///
/// The cap is evaluated first, so backoff only matters below the cap.
#[derive(Debug)]
pub struct AttemptLimiter<K = String, C = SystemClock>
where
    K: Hash + Eq,
    C: Clock,
{
    max_attempts: u32,
    window_nanos: u64,
    sweep_interval: Duration,
    ledger: AttemptLedger<K>,
    clock: C,
}

// methods for the AttemptLimiter type
impl<K, C> AttemptLimiter<K, C>
where
    K: Hash + Eq,
    C: Clock,
{
    // method to create a new attempt limiter from a config object
    pub fn with_config(config: AttemptLimiterConfig, clock: C) -> Result<Self, AttemptLimiterError> {
        config.validate()?;
        Ok(Self {
            max_attempts: config.max_attempts,
            // validate bounds window_seconds, so this cannot overflow
            window_nanos: config.window_seconds * NANOS_PER_SECOND,
            sweep_interval: Duration::from_secs(config.sweep_interval_seconds),
            ledger: AttemptLedger::new(),
            clock,
        })
    }

    // accessor method to return the failure cap per window
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    // accessor method to return the window length in seconds
    pub fn window_seconds(&self) -> u64 {
        self.window_nanos / NANOS_PER_SECOND
    }

    // accessor method to return the sweep cadence
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Number of keys currently holding a failure record.
    pub fn tracked_clients(&self) -> usize {
        self.ledger.len()
    }

    /// Failures recorded for `key` in its current window, if it has a record.
    /// Expired records that have not been reaped yet are still reported.
    pub fn failure_count<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ledger.get(key).map(|record| record.count)
    }

    /// Decide whether an attempt from `key` may proceed.
    ///
    /// The only mutation is removing a record whose window has fully elapsed.
    pub fn check<Q>(&self, key: &Q) -> AttemptDecision
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let Some(record) = self.ledger.get(key) else {
            return AttemptDecision::allow(self.max_attempts);
        };

        if record.window_elapsed(now, self.window_nanos) {
            // a concurrent record_fail may have restarted the window in between
            let window_nanos = self.window_nanos;
            if self
                .ledger
                .remove_if(key, |current| current.window_elapsed(now, window_nanos))
            {
                debug!(failures = record.count, "attempt window elapsed, record cleared");
            }
            return AttemptDecision::allow(self.max_attempts);
        }

        if record.count >= self.max_attempts {
            let elapsed = now.saturating_sub(record.window_start);
            let remaining = self.window_nanos.saturating_sub(elapsed);
            let wait_seconds = remaining.div_ceil(NANOS_PER_SECOND).max(1);
            trace!(failures = record.count, wait_seconds, "attempt blocked by cap");
            return AttemptDecision {
                allowed: false,
                wait_seconds,
                status: AttemptStatus::CapBlocked,
                remaining_attempts: 0,
            };
        }

        let remaining_attempts = self.max_attempts - record.count;
        let cooldown = backoff_nanos(record.count);
        let since_failure = now.saturating_sub(record.last_failure);
        if since_failure < cooldown {
            // round up so a retry never lands a fraction of a second early
            let wait_seconds = (cooldown - since_failure).div_ceil(NANOS_PER_SECOND);
            trace!(failures = record.count, wait_seconds, "attempt blocked by backoff");
            return AttemptDecision {
                allowed: false,
                wait_seconds,
                status: AttemptStatus::BackoffBlocked,
                remaining_attempts,
            };
        }

        AttemptDecision {
            allowed: true,
            wait_seconds: 0,
            status: AttemptStatus::Allowed,
            remaining_attempts,
        }
    }

    /// Record a failed authentication for `key`.
    ///
    /// Unconditional: callers are expected to have consulted `check` first.
    /// A record whose window has elapsed starts over at one failure.
    pub fn record_fail<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let now = self.clock.now();
        let window_nanos = self.window_nanos;
        let mut restarted = false;

        let record = self.ledger.upsert(
            key,
            |record| {
                if record.window_elapsed(now, window_nanos) {
                    *record = AttemptRecord::first(now);
                    restarted = true;
                } else {
                    record.count = record.count.saturating_add(1);
                    // the clock is read before the shard lock, so a racing caller may hold an older reading
                    record.last_failure = record.last_failure.max(now);
                }
            },
            || AttemptRecord::first(now),
        );

        if restarted {
            debug!("attempt window elapsed, new window started");
        }
        if record.count == self.max_attempts {
            warn!(
                failures = record.count,
                window_seconds = self.window_seconds(),
                "attempt cap reached, client blocked until window expires"
            );
        }
    }

    /// Clear all failure history for `key` after a successful authentication.
    pub fn record_success<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.ledger.remove(key) {
            trace!("attempt history cleared on success");
        }
    }

    /// Evict every record whose window has fully elapsed.
    /// Returns the number of evicted records.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let window_nanos = self.window_nanos;
        let evicted = self
            .ledger
            .retain(|record| !record.window_elapsed(now, window_nanos));
        if evicted > 0 {
            debug!(evicted, remaining = self.ledger.len(), "swept expired attempt records");
        }
        evicted
    }
}

// cooldown after `count` failures: 2^(count-1) seconds, saturating
fn backoff_nanos(count: u32) -> u64 {
    let seconds = 1u64
        .checked_shl(count.saturating_sub(1))
        .unwrap_or(u64::MAX);
    seconds.saturating_mul(NANOS_PER_SECOND)
}

/// Transient classification of a key computed by `check`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// No record, or the cooldown has passed.
    Allowed,
    /// Below the cap, but the cooldown since the last failure is still running.
    BackoffBlocked,
    /// The cap is reached; blocked until the window expires.
    CapBlocked,
}

/// Result of an admission check with metadata for the login response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptDecision {
    /// Whether the attempt may proceed
    pub allowed: bool,
    /// Whole seconds to wait before retrying; 0 when allowed
    pub wait_seconds: u64,
    /// Which policy produced the decision
    pub status: AttemptStatus,
    /// Failures left in the current window before the cap applies
    pub remaining_attempts: u32,
}

impl AttemptDecision {
    fn allow(remaining_attempts: u32) -> Self {
        Self {
            allowed: true,
            wait_seconds: 0,
            status: AttemptStatus::Allowed,
            remaining_attempts,
        }
    }
}

impl From<AttemptDecision> for (bool, u64) {
    fn from(decision: AttemptDecision) -> Self {
        (decision.allowed, decision.wait_seconds)
    }
}
