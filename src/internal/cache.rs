use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// A cache entry with expiration time
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Generic in-memory cache with TTL support.
///
/// A stale entry is removed at lookup time: `get` never returns data past
/// its TTL and never leaves the expired entry behind. There is no LRU or
/// size bound; the key space is bounded by the items a session touches.
/// Overlapping lookups for the same missing key are not deduplicated, so
/// two callers can both go to the network for one id. The remote source is
/// read-only and idempotent, so that costs a request, not correctness.
///
/// The optional metrics flag emits `tracing` debug timings. `Cache::new`
/// keeps metrics disabled; use `Cache::with_metrics` to enable them.
pub struct Cache<K, V> {
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
    enable_metrics: bool,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache with the given TTL and metrics disabled.
    pub fn new(ttl: Duration) -> Self {
        Self::with_metrics(ttl, false)
    }

    /// Create a new cache with the specified TTL and explicit metrics flag.
    pub fn with_metrics(ttl: Duration, enable_metrics: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            enable_metrics,
        }
    }

    /// Get a value from the cache if it exists and hasn't expired.
    /// An expired entry is evicted on the spot and reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let start = Instant::now();
        let mut found_stale = false;

        {
            let entries = self.entries.read().ok()?;
            if let Some(entry) = entries.get(key) {
                if Instant::now() < entry.expires_at {
                    if self.enable_metrics {
                        tracing::debug!(elapsed = ?start.elapsed(), hit = true, "cache.get");
                    }
                    return Some(entry.value.clone());
                }
                found_stale = true;
            }
        }

        if found_stale
            && let Ok(mut entries) = self.entries.write()
        {
            // Re-check under the write lock; a concurrent set may have
            // refreshed the entry between the two lock acquisitions.
            if let Some(entry) = entries.get(key)
                && Instant::now() >= entry.expires_at
            {
                entries.remove(key);
            }
        }

        if self.enable_metrics {
            tracing::debug!(elapsed = ?start.elapsed(), hit = false, stale = found_stale, "cache.get");
        }
        None
    }

    /// Set a value in the cache. Emits a tracing debug log with elapsed time when enabled.
    pub fn set(&self, key: K, value: V) {
        let start = Instant::now();
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key,
                CacheEntry {
                    value,
                    expires_at: Instant::now() + self.ttl,
                },
            );
            if self.enable_metrics {
                tracing::debug!(elapsed = ?start.elapsed(), "cache.set");
            }
        } else if self.enable_metrics {
            tracing::debug!(elapsed = ?start.elapsed(), "cache.set failed (lock poisoned)");
        }
    }

    /// Invalidate (remove) a specific key.
    #[allow(dead_code)]
    pub fn invalidate(&self, key: &K) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Clear all entries from the cache.
    #[allow(dead_code)]
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of entries currently stored, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries from the cache. Emits a tracing debug log with counts when enabled.
    #[allow(dead_code)]
    pub fn cleanup_expired(&self) {
        let start = Instant::now();
        if let Ok(mut entries) = self.entries.write() {
            let before = entries.len();
            let now = Instant::now();
            entries.retain(|_, entry| now < entry.expires_at);
            let after = entries.len();
            if self.enable_metrics {
                tracing::debug!(elapsed = ?start.elapsed(), removed = before.saturating_sub(after), remaining = after, "cache.cleanup_expired");
            }
        } else if self.enable_metrics {
            tracing::debug!(elapsed = ?start.elapsed(), "cache.cleanup_expired failed (lock poisoned)");
        }
    }
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
            enable_metrics: self.enable_metrics,
        }
    }
}
