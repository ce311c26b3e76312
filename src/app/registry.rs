//! Publisher registry: latest reading per publisher, with time-based eviction.
//!
//! The registry is the subscriber's only memory of the network. It holds
//! exactly one entry per publisher id and is bounded purely by the
//! staleness window: a publisher that stops talking is dropped on the next
//! eviction pass after its entry ages past the window.
//!
//! Overwrites are last-write-wins on *arrival*. A reading whose
//! `observed_at` is older than the stored one still replaces it; the
//! sender's clock is never consulted for ordering.

use std::collections::HashMap;

use log::debug;

use super::reading::{PublisherId, Reading};

/// Latest reading from one publisher, stamped with the receiver's clock.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub reading: Reading,
    /// Receiver clock (seconds) at arrival.
    pub received_at: u64,
}

impl RegistryEntry {
    /// Age relative to `now`. A `received_at` in the future counts as 0.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.received_at)
    }
}

/// Outcome of [`PublisherRegistry::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// First sighting of this publisher id.
    Inserted,
    /// An existing entry was overwritten.
    Replaced,
}

/// Map from publisher identity to its latest entry.
#[derive(Debug, Default)]
pub struct PublisherRegistry {
    entries: HashMap<PublisherId, RegistryEntry>,
}

impl PublisherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for the reading's publisher. Never fails.
    pub fn upsert(&mut self, reading: Reading, received_at: u64) -> Upsert {
        let id = reading.publisher_id.clone();
        let observed_at = reading.observed_at;
        let entry = RegistryEntry {
            reading,
            received_at,
        };
        match self.entries.insert(id, entry) {
            None => Upsert::Inserted,
            Some(prev) => {
                if observed_at < prev.reading.observed_at {
                    debug!(
                        "Registry: '{}' overwritten by older reading ({}s < {}s)",
                        prev.reading.publisher_id, observed_at, prev.reading.observed_at
                    );
                }
                Upsert::Replaced
            }
        }
    }

    /// Remove every entry with `now - received_at > window`.
    ///
    /// An entry whose age equals `window` survives. Returns the evicted ids.
    pub fn evict_stale(&mut self, now: u64, window: u64) -> Vec<PublisherId> {
        let mut evicted = Vec::new();
        self.entries.retain(|id, entry| {
            let keep = entry.age(now) <= window;
            if !keep {
                evicted.push(id.clone());
            }
            keep
        });
        evicted
    }

    /// Temperatures of all entries currently held.
    pub fn live_readings(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.values().map(|e| e.reading.temperature)
    }

    pub fn get(&self, id: &PublisherId) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &PublisherId) -> bool {
        self.entries.contains_key(id)
    }

    /// Publisher ids currently held (arbitrary order).
    pub fn ids(&self) -> impl Iterator<Item = &PublisherId> + '_ {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
