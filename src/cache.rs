//! Bounded in-memory TTL cache shared by every upstream accessor.
//!
//! Entries expire `ttl` after insertion. Reads sweep expired entries first, so
//! an entry at or past its deadline is never returned. Capacity is enforced on
//! insert by evicting the least-recently-touched entry.

use parking_lot::Mutex;
use posterdeck_common::ResolvedRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Entry in the cache.
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
    /// Logical clock value of the last `get` hit or `set`.
    last_touched: u64,
}

struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    tick: u64,
}

impl<V> Inner<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn sweep(&mut self, now: Instant) {
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_touched)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

/// Thread-safe TTL cache with LRU capacity eviction.
///
/// The lock is held only for map manipulation; values are cloned out, so keep
/// `V` cheap to clone (wrap large payloads in `Arc`).
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a new cache holding at most `capacity` live entries for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Look up a live entry, marking it as recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.sweep(now);
        let tick = inner.next_tick();
        inner.entries.get_mut(key).map(|entry| {
            entry.last_touched = tick;
            entry.value.clone()
        })
    }

    /// Insert or overwrite an entry; its expiry window starts now.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.sweep(now);
        let tick = inner.next_tick();
        inner.entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: now + self.ttl,
                last_touched: tick,
            },
        );
        while inner.entries.len() > self.capacity {
            inner.evict_oldest();
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Values stored in the shared cache.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// Raw JSON body of a provider response.
    Json(Arc<serde_json::Value>),
    /// Raw markup of a scraped search page.
    Markup(Arc<str>),
    /// A resolver decision.
    Resolved(Arc<ResolvedRecord>),
}

/// The cache instance handed to every adapter.
pub type SharedCache = Arc<TtlCache<CacheValue>>;

/// Build a cache key from a namespace and the semantic request.
///
/// Parameters are sorted so that equivalent requests map to the same key
/// regardless of argument order.
pub fn request_key(namespace: &str, endpoint: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    for (key, value) in sorted {
        hasher.update(b"\0");
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    format!("{namespace}:{}", hex::encode(hasher.finalize()))
}
