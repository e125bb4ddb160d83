// ABOUTME: Defines PermissionConfig - tunables for rule loading and caching.
// ABOUTME: Deserializable so hosts can keep it alongside their own settings.

use serde::{Deserialize, Serialize};

/// Default prefix for cache keys of reflected rule tables.
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "flight_permissions_class_methods_";

/// Default prefix of operations that never become rules.
pub const DEFAULT_RESERVED_PREFIX: &str = "__";

/// What a cache hit does to the live rule table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// The cached table replaces every live rule, including ones defined
    /// directly before the load.
    #[default]
    Replace,

    /// The cached table is merged like a fresh reflection pass.
    Merge,
}

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    pub snapshot_mode: SnapshotMode,
    pub cache_key_prefix: String,
    pub reserved_prefix: String,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            snapshot_mode: SnapshotMode::default(),
            cache_key_prefix: DEFAULT_CACHE_KEY_PREFIX.to_string(),
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
        }
    }
}

impl PermissionConfig {
    /// Cache key under which the rule table of `type_id` is stored.
    pub fn cache_key(&self, type_id: &str) -> String {
        format!("{}{}", self.cache_key_prefix, type_id)
    }

    /// Whether `method` is reserved and must not become a rule.
    pub fn is_reserved(&self, method: &str) -> bool {
        !self.reserved_prefix.is_empty() && method.starts_with(&self.reserved_prefix)
    }
}
