//! In-memory TTL caches with lazy expiry.
//!
//! Entries are checked against their deadline at read time; expired entries
//! are evicted on read and pruned on insert. There is no background sweeper.
//!
//! Locks are only held for the map access itself, never across an upstream
//! call, so concurrent misses on the same key may both fetch. The later
//! insert simply replaces the earlier one.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Deadline used when `now + ttl` is not representable
const MAX_ENTRY_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A cached value with its expiry deadline
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            expires_at: now
                .checked_add(ttl)
                .unwrap_or_else(|| now + ttl.min(MAX_ENTRY_TTL)),
        }
    }

    /// An entry is live strictly before its deadline
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

// =============================================================================
// Keyed cache
// =============================================================================

/// Keyed cache where every entry shares the same TTL
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a clone of the live value for `key`, evicting it if expired
    pub async fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: re-check under the write lock, a concurrent insert may have refreshed it
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key` with the cache TTL, replacing any previous entry
    pub async fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired_at(now));
        entries.insert(key, CacheEntry::new(value, self.ttl));
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// Single-value cache
// =============================================================================

/// Holds at most one value; the TTL is chosen per write
pub struct TtlSlot<V> {
    entry: RwLock<Option<CacheEntry<V>>>,
}

impl<V: Clone> TtlSlot<V> {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    /// Return a clone of the live value, if any
    pub async fn get(&self) -> Option<V> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| !e.is_expired())
            .map(|e| e.value.clone())
    }

    pub async fn set(&self, value: V, ttl: Duration) {
        *self.entry.write().await = Some(CacheEntry::new(value, ttl));
    }

    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }
}

impl<V: Clone> Default for TtlSlot<V> {
    fn default() -> Self {
        Self::new()
    }
}
