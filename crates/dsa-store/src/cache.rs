//! TTL cache over a [`Store`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{Entry, Store};

/// Lifetime of a cached API response unless the caller says otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(millis)
            .unwrap_or(0)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(millis(by), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Keyed cache whose entries expire after a per-entry TTL.
pub struct Cache<S: Store, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: Store> Cache<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: Store, C: Clock> Cache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a live entry. Expired entries are removed and reported as misses;
    /// entries that no longer decode as `T` are dropped the same way.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(entry) = self.store.get(key)? else {
            debug!(key, "cache miss");
            return Ok(None);
        };
        if entry.is_expired(self.clock.now_ms()) {
            debug!(key, "cache entry expired");
            self.store.delete(key)?;
            return Ok(None);
        }
        match serde_json::from_value(entry.value) {
            Ok(value) => {
                debug!(key, "cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(key, "dropping undecodable cache entry: {}", e);
                self.store.delete(key)?;
                Ok(None)
            }
        }
    }

    /// Store `value` under `key` for `ttl`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value: serde_json::to_value(value)?,
            expires_at_ms: self.clock.now_ms().saturating_add(millis(ttl)),
        };
        self.store.put(key, entry)
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        self.store.delete(key)
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now_ms();
        let mut removed = 0;
        for key in self.store.keys()? {
            if let Some(entry) = self.store.get(&key)? {
                if entry.is_expired(now) && self.store.delete(&key)? {
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            debug!(removed, "purged expired cache entries");
        }
        Ok(removed)
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn clear_prefix(&self, prefix: &str) -> Result<usize> {
        let mut removed = 0;
        for key in self.store.keys_with_prefix(prefix)? {
            if self.store.delete(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::store::MemoryStore;

    fn cache() -> (Cache<MemoryStore, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        (Cache::with_clock(MemoryStore::new(), Arc::clone(&clock)), clock)
    }

    #[test]
    fn returns_value_until_ttl_elapses() {
        let (cache, clock) = cache();
        cache.set("k", &vec![1, 2, 3], Duration::from_secs(60)).unwrap();

        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get::<Vec<i32>>("k").unwrap(), Some(vec![1, 2, 3]));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get::<Vec<i32>>("k").unwrap(), None);
        assert!(cache.store().get("k").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_and_refreshes_ttl() {
        let (cache, clock) = cache();
        cache.set("k", &"old", Duration::from_secs(10)).unwrap();
        clock.advance(Duration::from_secs(8));
        cache.set("k", &"new", Duration::from_secs(10)).unwrap();
        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get::<String>("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn wrong_type_is_a_miss() {
        let (cache, _) = cache();
        cache.set("k", &"text", DEFAULT_TTL).unwrap();
        assert_eq!(cache.get::<u32>("k").unwrap(), None);
        assert_eq!(cache.get::<String>("k").unwrap(), None);
    }

    #[test]
    fn purge_removes_only_expired() {
        let (cache, clock) = cache();
        cache.set("short", &1, Duration::from_secs(1)).unwrap();
        cache.set("long", &2, Duration::from_secs(100)).unwrap();
        clock.advance(Duration::from_secs(5));

        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert_eq!(cache.store().keys().unwrap(), vec!["long".to_string()]);
    }

    #[test]
    fn clear_prefix_and_remove() {
        let (cache, _) = cache();
        cache.set("leetcode-solved:a", &1, DEFAULT_TTL).unwrap();
        cache.set("leetcode-solved:b", &1, DEFAULT_TTL).unwrap();
        cache.set("codeforces-solved:a", &1, DEFAULT_TTL).unwrap();

        assert_eq!(cache.clear_prefix("leetcode-").unwrap(), 2);
        assert!(cache.remove("codeforces-solved:a").unwrap());
        assert!(!cache.remove("codeforces-solved:a").unwrap());
    }

    #[test]
    fn huge_ttl_never_expires_early() {
        let (cache, clock) = cache();
        cache.set("k", &1, Duration::MAX).unwrap();
        assert_eq!(cache.store().get("k").unwrap().unwrap().expires_at_ms, u64::MAX);

        clock.advance(Duration::from_secs(365 * 24 * 3600));
        assert_eq!(cache.get::<i32>("k").unwrap(), Some(1));
    }
}
