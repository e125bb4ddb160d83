// ABOUTME: Implements FileCache - a RuleCache persisted as one JSON document
// ABOUTME: per cache name, so rule tables survive across processes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RuleCache, unix_now};

/// File suffix for cache documents.
pub const CACHE_FILE_SUFFIX: &str = ".cache.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheDocument {
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    value: Value,
    /// Absolute expiry in unix seconds.
    expires_at: u64,
}

/// A cache stored at `<dir>/<name>.cache.json`.
///
/// Every read reloads the file, so separate instances pointing at the same
/// path observe each other's writes.
pub struct FileCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}{CACHE_FILE_SUFFIX}")),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the backing file. Missing files are fine.
    pub fn clear(&self) -> Result<(), anyhow::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }

    fn load(&self) -> Result<CacheDocument, anyhow::Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheDocument::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()));
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn save(&self, doc: &CacheDocument) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string(doc)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl RuleCache for FileCache {
    fn is_cached(&self, key: &str) -> Result<bool, anyhow::Error> {
        Ok(self.retrieve(key)?.is_some())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Value>, anyhow::Error> {
        let mut doc = self.load()?;
        let now = unix_now();
        Ok(doc
            .entries
            .remove(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value))
    }

    fn store(&self, key: &str, value: Value, ttl_secs: u64) -> Result<(), anyhow::Error> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("file cache lock poisoned"))?;

        // An unreadable document is rebuilt rather than blocking the write.
        let mut doc = self.load().unwrap_or_default();
        let now = unix_now();
        doc.entries.retain(|_, entry| entry.expires_at > now);
        doc.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now.saturating_add(ttl_secs),
            },
        );
        self.save(&doc)
    }
}
