// ABOUTME: Builder for constructing Permission evaluators with a role, app
// ABOUTME: context, optional rule cache, resolver types and configuration.

use std::sync::Arc;

use super::{Permission, PermissionConfig, SnapshotMode};
use crate::cache::RuleCache;
use crate::class::{ClassCatalog, InstanceCache, PermissionClass};
use crate::context::AppContext;
use crate::rule::RuleRegistry;

/// Builder for [`Permission`].
#[derive(Default)]
pub struct PermissionBuilder {
    role: String,
    app: AppContext,
    cache: Option<Arc<dyn RuleCache>>,
    catalog: ClassCatalog,
    config: PermissionConfig,
}

impl PermissionBuilder {
    /// Create a new builder: empty role, empty context, no cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial role.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the context handed to resolver constructors.
    pub fn app(mut self, app: AppContext) -> Self {
        self.app = app;
        self
    }

    /// Use `cache` for reflected rule tables.
    pub fn cache<C: RuleCache + 'static>(self, cache: C) -> Self {
        self.shared_cache(Arc::new(cache))
    }

    /// Use a cache shared with other evaluators.
    pub fn shared_cache(mut self, cache: Arc<dyn RuleCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register a resolver type.
    pub fn class<T: PermissionClass>(mut self) -> Self {
        self.catalog.register::<T>();
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: PermissionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set what a cache hit does to the live rules.
    pub fn snapshot_mode(mut self, mode: SnapshotMode) -> Self {
        self.config.snapshot_mode = mode;
        self
    }

    /// Build the evaluator.
    pub fn build(self) -> Permission {
        Permission {
            current_role: self.role,
            app: self.app,
            cache: self.cache,
            catalog: self.catalog,
            rules: RuleRegistry::new(),
            instances: InstanceCache::new(),
            config: self.config,
        }
    }
}
