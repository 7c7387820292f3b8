//! Side-effecting submissions gated by a per-key state machine.
//!
//! A key moves `Idle -> Submitting -> Done`. While a key is submitting, repeats are refused.
//! Once done, repeats get the recorded result back instead of a second remote call. A
//! failed attempt returns the key to `Idle` so the caller can retry.

pub(crate) mod gate;
pub(crate) mod listing;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmissionState<V> {
    Idle,
    Submitting,
    Done(V),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Begin<V> {
    /// the key moved to `Submitting`, the caller owns the attempt
    Proceed,
    InFlight,
    Completed(V),
}

enum Entry<V> {
    Submitting,
    Done { value: V, finished_at: Instant },
}

/// Completed keys are kept for `ttl` after they finish and are evicted on the next `begin`.
pub(crate) struct SubmissionRegistry<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> SubmissionRegistry<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        // entries stay consistent even if a holder panicked, every update is a single insert/remove
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expired(&self, finished_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(finished_at) >= self.ttl
    }

    pub fn state(&self, key: &K) -> SubmissionState<V> {
        let now = Instant::now();
        match self.entries().get(key) {
            Some(Entry::Submitting) => SubmissionState::Submitting,
            Some(Entry::Done { value, finished_at }) if !self.expired(*finished_at, now) => {
                SubmissionState::Done(value.clone())
            }
            _ => SubmissionState::Idle,
        }
    }

    pub fn begin(&self, key: K) -> Begin<V> {
        self.begin_at(key, Instant::now())
    }

    fn begin_at(&self, key: K, now: Instant) -> Begin<V> {
        let mut entries = self.entries();
        entries.retain(|_, entry| match entry {
            Entry::Submitting => true,
            Entry::Done { finished_at, .. } => !self.expired(*finished_at, now),
        });
        match entries.get(&key) {
            Some(Entry::Submitting) => Begin::InFlight,
            Some(Entry::Done { value, .. }) => Begin::Completed(value.clone()),
            None => {
                entries.insert(key, Entry::Submitting);
                Begin::Proceed
            }
        }
    }

    pub fn finish(&self, key: K, value: V) {
        self.finish_at(key, value, Instant::now());
    }

    fn finish_at(&self, key: K, value: V, now: Instant) {
        self.entries().insert(key, Entry::Done { value, finished_at: now });
    }

    /// Back to `Idle`. A key that already finished keeps its result.
    pub fn abort(&self, key: &K) {
        let mut entries = self.entries();
        if matches!(entries.get(key), Some(Entry::Submitting)) {
            entries.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries().len()
    }
}
