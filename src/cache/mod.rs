// ABOUTME: Cache module - the RuleCache collaborator trait and two stores.
// ABOUTME: Used to keep reflected rule tables between evaluator instances.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

/// Key-value store with per-entry expiry, consumed by the rule loader.
///
/// Errors are reported to the evaluator, which logs them and carries on
/// without caching.
pub trait RuleCache: Send + Sync {
    /// Whether `key` holds an unexpired value.
    fn is_cached(&self, key: &str) -> Result<bool, anyhow::Error>;

    /// The value stored under `key`, if present and unexpired.
    fn retrieve(&self, key: &str) -> Result<Option<Value>, anyhow::Error>;

    /// Store `value` under `key` for `ttl_secs` seconds.
    fn store(&self, key: &str, value: Value, ttl_secs: u64) -> Result<(), anyhow::Error>;
}

/// Seconds since the unix epoch.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
