//! In-process cache store with per-namespace partitions and TTL expiry.

use super::{CacheInterface, CacheKey, CacheMetrics, Namespace, NamespaceStats};
use async_trait::async_trait;
use boxoffice_core::{BoxOfficeError, BoxOfficeResult};
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    expired: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

const GENERATION_STRIPES: usize = 64;

/// One namespace: its own map, lock and counters.
///
/// Write generations are striped by key hash. A delete advances the stripe
/// of its key, so an unrelated delete on the same stripe can only cause a
/// conditional fill to be skipped, never a stale one to be accepted.
struct Partition {
    entries: RwLock<HashMap<String, CacheEntry>>,
    generations: [AtomicU64; GENERATION_STRIPES],
    counters: Counters,
}

impl Default for Partition {
    fn default() -> Self {
        Self {
            entries: RwLock::default(),
            generations: std::array::from_fn(|_| AtomicU64::new(0)),
            counters: Counters::default(),
        }
    }
}

impl Partition {
    fn stripe(&self, key: &str) -> &AtomicU64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() % GENERATION_STRIPES as u64) as usize;
        &self.generations[index]
    }

    /// Advances every stripe. Must be called with the entries write lock held.
    fn advance_all(&self) {
        for generation in &self.generations {
            generation.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// In-memory [`CacheInterface`] implementation.
///
/// Each namespace is an independent partition behind its own `RwLock`, so a
/// sweep or flush of one namespace never blocks another. Expiry is checked on
/// every read; the sweeper only reclaims memory.
pub struct MemoryCacheStore {
    events: Partition,
    users: Partition,
    bookings: Partition,
    enabled: bool,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    /// Create an enabled, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Partition::default(),
            users: Partition::default(),
            bookings: Partition::default(),
            enabled: true,
        }
    }

    /// Create a store that never holds anything (every read misses).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    fn partition(&self, namespace: Namespace) -> &Partition {
        match namespace {
            Namespace::Events => &self.events,
            Namespace::Users => &self.users,
            Namespace::Bookings => &self.bookings,
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<String> {
        let partition = self.partition(key.namespace());
        let now = Instant::now();

        let expired = {
            let entries = partition.entries.read();
            match entries.get(key.as_str()) {
                Some(entry) if !entry.is_expired(now) => {
                    Counters::bump(&partition.counters.hits, 1);
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = partition.entries.write();
            // Re-check: a writer may have refreshed the entry between locks.
            if entries
                .get(key.as_str())
                .is_some_and(|entry| entry.is_expired(now))
            {
                entries.remove(key.as_str());
                Counters::bump(&partition.counters.expired, 1);
                CacheMetrics::expired(key.namespace(), 1);
                trace!(key = %key, "Lazily evicted expired entry");
            }
        }

        Counters::bump(&partition.counters.misses, 1);
        None
    }

    /// Stores `value`. With `expected = Some(generation)` the write is
    /// dropped if the key was deleted since that generation was read.
    fn insert(
        &self,
        key: &CacheKey,
        value: &str,
        ttl: Duration,
        expected: Option<u64>,
    ) -> BoxOfficeResult<bool> {
        if ttl.is_zero() {
            return Err(BoxOfficeError::configuration(format!(
                "cache TTL must be greater than zero (key {key})"
            )));
        }
        let expires_at = Instant::now().checked_add(ttl).ok_or_else(|| {
            BoxOfficeError::configuration(format!(
                "cache TTL of {}s is out of range (key {key})",
                ttl.as_secs()
            ))
        })?;
        if !self.enabled {
            return Ok(false);
        }

        let partition = self.partition(key.namespace());
        {
            let mut entries = partition.entries.write();
            if let Some(generation) = expected {
                if partition.stripe(key.as_str()).load(Ordering::SeqCst) != generation {
                    return Ok(false);
                }
            }
            entries.insert(
                key.as_str().to_owned(),
                CacheEntry {
                    value: value.to_owned(),
                    expires_at,
                },
            );
        }
        Counters::bump(&partition.counters.sets, 1);
        Ok(true)
    }

    fn remove(&self, key: &CacheKey) -> bool {
        let partition = self.partition(key.namespace());
        let removed = {
            let mut entries = partition.entries.write();
            partition.stripe(key.as_str()).fetch_add(1, Ordering::SeqCst);
            entries.remove(key.as_str()).is_some()
        };
        if removed {
            Counters::bump(&partition.counters.deletes, 1);
        }
        removed
    }

    fn contains_live(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        self.partition(key.namespace())
            .entries
            .read()
            .get(key.as_str())
            .is_some_and(|entry| !entry.is_expired(now))
    }

    fn clear(&self, namespace: Namespace) -> u64 {
        let partition = self.partition(namespace);
        let mut entries = partition.entries.write();
        partition.advance_all();
        let count = entries.len() as u64;
        entries.clear();
        count
    }

    /// Removes expired entries. Candidates are collected under the read lock
    /// so readers are only excluded while the removals themselves happen.
    fn sweep(&self, namespace: Namespace) -> u64 {
        let partition = self.partition(namespace);
        let now = Instant::now();

        let candidates: Vec<String> = partition
            .entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        if candidates.is_empty() {
            return 0;
        }

        let mut removed = 0;
        {
            let mut entries = partition.entries.write();
            for key in candidates {
                if entries.get(&key).is_some_and(|entry| entry.is_expired(now)) {
                    entries.remove(&key);
                    removed += 1;
                }
            }
        }

        Counters::bump(&partition.counters.expired, removed);
        CacheMetrics::expired(namespace, removed);
        removed
    }
}

#[async_trait]
impl CacheInterface for MemoryCacheStore {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn get_raw(&self, key: &CacheKey) -> BoxOfficeResult<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(self.lookup(key))
    }

    async fn set_raw(&self, key: &CacheKey, value: &str, ttl: Duration) -> BoxOfficeResult<()> {
        if self.insert(key, value, ttl, None)? {
            debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value");
        }
        Ok(())
    }

    async fn set_raw_if(
        &self,
        key: &CacheKey,
        value: &str,
        ttl: Duration,
        generation: u64,
    ) -> BoxOfficeResult<bool> {
        let stored = self.insert(key, value, ttl, Some(generation))?;
        if stored {
            debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value");
        }
        Ok(stored)
    }

    fn generation(&self, key: &CacheKey) -> u64 {
        self.partition(key.namespace())
            .stripe(key.as_str())
            .load(Ordering::SeqCst)
    }

    async fn delete(&self, key: &CacheKey) -> BoxOfficeResult<bool> {
        if !self.enabled {
            return Ok(false);
        }
        Ok(self.remove(key))
    }

    async fn exists(&self, key: &CacheKey) -> BoxOfficeResult<bool> {
        Ok(self.enabled && self.contains_live(key))
    }

    async fn flush(&self, namespace: Namespace) -> BoxOfficeResult<u64> {
        let count = self.clear(namespace);
        debug!(%namespace, count, "Flushed cache namespace");
        Ok(count)
    }

    async fn purge_expired(&self, namespace: Namespace) -> BoxOfficeResult<u64> {
        Ok(self.sweep(namespace))
    }

    fn stats(&self, namespace: Namespace) -> NamespaceStats {
        let partition = self.partition(namespace);
        let counters = &partition.counters;
        NamespaceStats {
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            sets: counters.sets.load(Ordering::Relaxed),
            deletes: counters.deletes.load(Ordering::Relaxed),
            expired: counters.expired.load(Ordering::Relaxed),
            entries: partition.entries.read().len(),
        }
    }
}
