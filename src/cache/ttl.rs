//! Size- and age-bounded LRU cache
//!
//! Entries carry their insertion instant. Lookups never extend an entry's
//! lifetime; they only mark it as recently used.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

/// Default number of distinct entries kept
pub const DEFAULT_CAPACITY: usize = 200;

/// Default time-to-live for an entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A cached value and when it was stored
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// LRU cache whose entries also expire `ttl` after insertion
#[derive(Debug)]
pub struct TtlCache<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Returns a fresh value for `key`, dropping it if it has expired.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Stores `value`, purging expired entries first.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now())
    }

    /// Number of entries currently held, including any not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let ttl = self.ttl;
        let fresh = self
            .entries
            .get(key)
            .map(|entry| now.saturating_duration_since(entry.inserted_at) < ttl)?;

        if fresh {
            return self.entries.peek(key).map(|entry| entry.value.clone());
        }

        log::debug!("Dropping expired cache entry");
        self.entries.pop(key);
        None
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.purge_expired(now);

        let entry = CacheEntry {
            value,
            inserted_at: now,
        };
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                log::debug!(
                    "Cache full ({} entries), evicted least-recently-used entry",
                    self.capacity()
                );
            }
        }
    }

    /// Removes every entry past its TTL
    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| !self.is_fresh(entry, now))
            .map(|(key, _)| key.clone())
            .collect();

        if !expired.is_empty() {
            log::debug!("Purging {} expired cache entries", expired.len());
        }
        for key in expired {
            self.entries.pop(&key);
        }
    }
}
