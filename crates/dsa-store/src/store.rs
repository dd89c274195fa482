//! Backing stores for cached entries.
//!
//! A [`Store`] holds opaque JSON entries by key. [`MemoryStore`] lives for the
//! process; [`DbStore`] keeps entries in RocksDB so they survive restarts.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rocksdb::{IteratorMode, Options, DB};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

/// A stored value with its expiry, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub value: Value,
    pub expires_at_ms: u64,
}

impl Entry {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

/// Key/entry storage behind a [`crate::Cache`].
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Entry>>;

    fn put(&self, key: &str, entry: Entry) -> Result<()>;

    /// Remove `key`, returning whether it was present.
    fn delete(&self, key: &str) -> Result<bool>;

    fn keys(&self) -> Result<Vec<String>>;

    /// Keys starting with `prefix`, in key order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Entry>> {
        // A poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        Ok(self.entries().get(key).cloned())
    }

    fn put(&self, key: &str, entry: Entry) -> Result<()> {
        self.entries().insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries().keys().cloned().collect())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries()
            .range(prefix.to_string()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Durable store using RocksDB.
pub struct DbStore {
    db: DB,
}

impl DbStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened cache store");
        Ok(Self { db })
    }
}

impl Store for DbStore {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, entry: Entry) -> Result<()> {
        let value = serde_json::to_vec(&entry)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        if self.db.get_pinned(key.as_bytes())?.is_none() {
            return Ok(false);
        }
        self.db.delete(key.as_bytes())?;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for item in self.db.iterator(IteratorMode::Start) {
            let (key, _) = item?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.as_bytes();
        let mut keys = Vec::new();

        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, _) = item?;
            if key.starts_with(prefix) {
                keys.push(String::from_utf8_lossy(&key).into_owned());
            } else {
                break;
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn entry(value: Value) -> Entry {
        Entry {
            value,
            expires_at_ms: 1_000,
        }
    }

    #[test]
    fn memory_store_put_get_delete() {
        let store = MemoryStore::new();
        store.put("a", entry(json!(1))).unwrap();
        assert_eq!(store.get("a").unwrap(), Some(entry(json!(1))));
        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn memory_store_prefix_listing() {
        let store = MemoryStore::new();
        for key in ["codeforces-solved:x", "leetcode-solved:a", "leetcode-solved:b", "z"] {
            store.put(key, entry(json!(0))).unwrap();
        }
        assert_eq!(
            store.keys_with_prefix("leetcode-").unwrap(),
            vec!["leetcode-solved:a".to_string(), "leetcode-solved:b".to_string()]
        );
        assert!(store.keys_with_prefix("missing").unwrap().is_empty());
    }

    #[test]
    fn db_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache-db");

        {
            let store = DbStore::open(&path).unwrap();
            store
                .put("leetcode-solved:alice", entry(json!({"totalSolved": 3})))
                .unwrap();
            store.put("gone", entry(json!(null))).unwrap();
            assert!(store.delete("gone").unwrap());
            assert!(!store.delete("gone").unwrap());
        }

        let store = DbStore::open(&path).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["leetcode-solved:alice".to_string()]);
        let stored = store.get("leetcode-solved:alice").unwrap().unwrap();
        assert_eq!(stored.value["totalSolved"], 3);
    }

    #[test]
    fn db_store_prefix_listing_stops_at_prefix_end() {
        let dir = tempfile::tempdir().unwrap();
        let store = DbStore::open(dir.path()).unwrap();
        for key in ["codeforces-solved:x", "leetcode-solved:a", "leetcode-solved:b", "z"] {
            store.put(key, entry(json!(0))).unwrap();
        }
        assert_eq!(
            store.keys_with_prefix("leetcode-").unwrap(),
            vec!["leetcode-solved:a".to_string(), "leetcode-solved:b".to_string()]
        );
    }

    #[test]
    fn db_store_rejects_undecodable_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = DbStore::open(dir.path()).unwrap();
        store.db.put(b"k", b"not json").unwrap();
        assert!(matches!(store.get("k"), Err(Error::Serialization(_))));
    }

    #[test]
    fn entry_expiry_is_inclusive() {
        let e = entry(json!(0));
        assert!(!e.is_expired(999));
        assert!(e.is_expired(1_000));
    }
}
