// ABOUTME: Implements MemoryCache - an in-process RuleCache with TTL expiry.
// ABOUTME: Expired entries are dropped on read and on store; nothing is persisted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

use super::RuleCache;

struct Entry {
    value: Value,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// A thread-safe in-memory cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Expired ones count until the next read or store prunes them.
    pub fn len(&self) -> usize {
        self.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, anyhow::Error> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory cache lock poisoned"))
    }
}

impl RuleCache for MemoryCache {
    fn is_cached(&self, key: &str) -> Result<bool, anyhow::Error> {
        Ok(self.retrieve(key)?.is_some())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Value>, anyhow::Error> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    fn store(&self, key: &str, value: Value, ttl_secs: u64) -> Result<(), anyhow::Error> {
        let now = Instant::now();
        let expires_at = now.checked_add(Duration::from_secs(ttl_secs));

        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}
