// ABOUTME: Bulk rule loading from the public operations of a catalogued type,
// ABOUTME: with optional snapshot caching through a RuleCache.

use std::collections::BTreeMap;

use super::{Permission, SnapshotMode};
use crate::cache::RuleCache;
use crate::class::PermissionClass;
use crate::error::Result;
use crate::rule::{MethodRef, ResolverRef};

/// A reflected rule table as stored in the cache.
pub type RuleSnapshot = BTreeMap<String, MethodRef>;

impl Permission {
    /// Define one rule per public operation of `type_id`.
    ///
    /// With a cache configured and `ttl_secs > 0`, a valid cached table is
    /// applied instead of reflecting. Under [`SnapshotMode::Replace`] that
    /// discards every rule defined before this call. Reflected rules overwrite
    /// same-named rules without a duplicate check.
    pub fn define_rules_from_class_methods(
        &mut self,
        type_id: &str,
        ttl_secs: u64,
    ) -> Result<()> {
        let cache = self.cache.clone().filter(|_| ttl_secs > 0);
        let cache_key = self.config.cache_key(type_id);

        if let Some(snapshot) = cache
            .as_ref()
            .and_then(|c| read_snapshot(&**c, &cache_key))
        {
            tracing::info!(
                type_id,
                rules = snapshot.len(),
                mode = ?self.config.snapshot_mode,
                "loaded rules from cache"
            );
            let entries = into_entries(snapshot);
            match self.config.snapshot_mode {
                SnapshotMode::Replace => self.rules.replace(entries),
                SnapshotMode::Merge => self.rules.merge(entries),
            }
            return Ok(());
        }

        let snapshot: RuleSnapshot = self
            .catalog
            .methods(type_id)?
            .iter()
            .filter(|m| !self.config.is_reserved(m))
            .map(|m| (m.to_string(), MethodRef::new(type_id, *m)))
            .collect();

        if let Some(cache) = &cache {
            write_snapshot(&**cache, &cache_key, &snapshot, ttl_secs);
        }

        tracing::info!(type_id, rules = snapshot.len(), "loaded rules from type");
        self.rules.merge(into_entries(snapshot));
        Ok(())
    }

    /// Register `T` and load its operations as rules.
    pub fn define_rules_from<T: PermissionClass>(&mut self, ttl_secs: u64) -> Result<()> {
        self.register_class::<T>();
        self.define_rules_from_class_methods(T::TYPE_ID, ttl_secs)
    }
}

fn into_entries(snapshot: RuleSnapshot) -> impl Iterator<Item = (String, ResolverRef)> {
    snapshot
        .into_iter()
        .map(|(name, method)| (name, ResolverRef::Method(method)))
}

/// Fetch a cached table. Every failure reads as a miss.
fn read_snapshot(cache: &dyn RuleCache, key: &str) -> Option<RuleSnapshot> {
    match cache.is_cached(key) {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(key, "rule cache miss");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "rule cache lookup failed");
            return None;
        }
    }

    let value = match cache.retrieve(key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            tracing::debug!(key, "rule cache entry vanished before read");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "rule cache read failed");
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(snapshot) => {
            tracing::debug!(key, "rule cache hit");
            Some(snapshot)
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "cached rule table is not decodable");
            None
        }
    }
}

/// Store a table. Failures are logged and dropped.
fn write_snapshot(cache: &dyn RuleCache, key: &str, snapshot: &RuleSnapshot, ttl_secs: u64) {
    let value = match serde_json::to_value(snapshot) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to encode rule table");
            return;
        }
    };
    if let Err(e) = cache.store(key, value, ttl_secs) {
        tracing::warn!(key, error = %e, "rule cache write failed");
    }
}
