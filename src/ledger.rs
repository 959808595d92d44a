// src/ledger.rs

// keyed store of failed-attempt records, shared by the limiter and its sweeper

// dependencies
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::borrow::Borrow;
use std::hash::Hash;

/// Failure history for one client key.
/// Timestamps are clock readings in nanoseconds.
/// A stored record always has `count >= 1` and `last_failure >= window_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttemptRecord {
    pub(crate) count: u32,
    pub(crate) window_start: u64,
    pub(crate) last_failure: u64,
}

impl AttemptRecord {
    // record for the first failure of a fresh window
    pub(crate) fn first(now: u64) -> Self {
        Self {
            count: 1,
            window_start: now,
            last_failure: now,
        }
    }

    // true once more than a full window has passed since the first failure
    pub(crate) fn window_elapsed(&self, now: u64, window_nanos: u64) -> bool {
        now.saturating_sub(self.window_start) > window_nanos
    }
}

/// The ledger: client key -> AttemptRecord.
/// `DashMap` shards its locking, so a single key's read-modify-write is atomic
/// while operations on unrelated keys rarely contend.
#[derive(Debug)]
pub(crate) struct AttemptLedger<K>
where
    K: Hash + Eq,
{
    records: DashMap<K, AttemptRecord>,
}

impl<K> AttemptLedger<K>
where
    K: Hash + Eq,
{
    pub(crate) fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    // copy of the record, if any; the shard lock is released on return
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<AttemptRecord>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.get(key).map(|entry| *entry.value())
    }

    /// Apply `update` to the existing record, or store `insert()` when absent.
    /// Both run under the key's shard lock. Returns the record as stored.
    pub(crate) fn upsert<Q>(
        &self,
        key: &Q,
        update: impl FnOnce(&mut AttemptRecord),
        insert: impl FnOnce() -> AttemptRecord,
    ) -> AttemptRecord
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        // fast path: no key allocation for a client we already track
        if let Some(mut entry) = self.records.get_mut(key) {
            update(entry.value_mut());
            return *entry.value();
        }

        match self.records.entry(key.to_owned()) {
            Entry::Occupied(mut entry) => {
                update(entry.get_mut());
                *entry.get()
            }
            Entry::Vacant(entry) => *entry.insert(insert()).value(),
        }
    }

    pub(crate) fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.remove(key).is_some()
    }

    // remove only if `predicate` still holds once the shard lock is taken
    pub(crate) fn remove_if<Q>(&self, key: &Q, predicate: impl FnOnce(&AttemptRecord) -> bool) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records
            .remove_if(key, |_, record| predicate(record))
            .is_some()
    }

    /// Keep only records for which `keep` returns true; returns how many were evicted.
    /// Locks one shard at a time, never the whole map.
    pub(crate) fn retain(&self, mut keep: impl FnMut(&AttemptRecord) -> bool) -> usize {
        let mut evicted = 0;
        self.records.retain(|_, record| {
            let kept = keep(record);
            if !kept {
                evicted += 1;
            }
            kept
        });
        evicted
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}
