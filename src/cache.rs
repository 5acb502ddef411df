//! Time-bounded memo of acceptance results.

use crate::{automaton::Automaton, config::Config};
use log::trace;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy)]
struct Entry {
    accepted: bool,
    inserted_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}

#[derive(Debug)]
struct Table {
    entries: HashMap<(u64, String), Entry>,
    last_sweep: Instant,
}

impl Table {
    fn sweep(&mut self, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        self.last_sweep = Instant::now();
        before - self.entries.len()
    }
}

/// Remembers `accept` results per `(fingerprint, input)` for a limited time.
///
/// Expired entries are never returned. `accept` drops them all at most once per
/// TTL, so the table only holds entries from roughly the last two TTLs.
/// `cleanup_expired` drops them on demand. Safe to share between threads.
#[derive(Debug)]
pub struct AcceptCache {
    ttl: Duration,
    table: Mutex<Table>,
}

impl Default for AcceptCache {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AcceptCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            table: Mutex::new(Table {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.result_ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock cannot leave an entry half written.
    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Same result as `automaton.accept(input)`.
    pub fn accept(&self, automaton: &Automaton, input: &str) -> bool {
        let key = (automaton.fingerprint(), input.to_string());

        if let Some(entry) = self.table().entries.get(&key) {
            if !entry.is_expired(self.ttl) {
                trace!("cached result for {:?}", input);
                return entry.accepted;
            }
        }

        // Simulate without holding the lock.
        let accepted = automaton.accept(input);

        let mut table = self.table();
        if table.last_sweep.elapsed() > self.ttl {
            let removed = table.sweep(self.ttl);
            trace!("dropped {} expired results", removed);
        }
        table.entries.insert(
            key,
            Entry {
                accepted,
                inserted_at: Instant::now(),
            },
        );
        accepted
    }

    /// Drops expired entries and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.table().sweep(self.ttl)
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.table().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().entries.is_empty()
    }

    pub fn clear(&self) {
        self.table().entries.clear()
    }
}
