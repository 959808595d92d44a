// src/sweeper.rs

//! Background eviction of expired attempt records.
//!
//! `check` and `record_fail` already drop expired records lazily, but a client
//! that fails once and never returns would otherwise stay in the ledger forever.

// dependencies
use crate::clock::Clock;
use crate::limiter::AttemptLimiter;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Handle to a running sweeper task.
///
/// The sweeper stops when `shutdown` is called, when the handle is dropped,
/// or when the limiter itself has been dropped.
#[must_use = "dropping the handle stops the sweeper"]
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Whether the sweeper task is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signal the sweeper to stop and wait for it to exit.
    /// A panic inside the sweep task is logged, not propagated.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            if e.is_panic() {
                warn!(error = %e, "attempt sweeper panicked");
            }
        }
    }
}

impl<K, C> AttemptLimiter<K, C>
where
    K: Hash + Eq + Send + Sync + 'static,
    C: Clock + 'static,
{
    /// Spawn the periodic sweep onto the current tokio runtime.
    ///
    /// The first pass runs immediately, then once per configured sweep interval.
    /// The task holds only a weak reference, so it never keeps the limiter alive.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let period = self.sweep_interval();
        let task = tokio::spawn(run_sweeper(Arc::downgrade(self), period, shutdown_rx));

        info!(interval_secs = period.as_secs(), "attempt sweeper started");

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

async fn run_sweeper<K, C>(
    limiter: Weak<AttemptLimiter<K, C>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Hash + Eq + Send + Sync + 'static,
    C: Clock + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(limiter) = limiter.upgrade() else {
                    debug!("limiter dropped, attempt sweeper exiting");
                    break;
                };
                limiter.sweep_expired();
            }
            // Err means the handle was dropped
            _ = shutdown.changed() => {
                debug!("attempt sweeper shutting down");
                break;
            }
        }
    }
}
