// ABOUTME: Implements the InstanceCache - lazily constructed resolver objects
// ABOUTME: memoized per type identifier for the lifetime of one evaluator.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::{ClassCatalog, ResolverInstance};
use crate::context::AppContext;
use crate::error::Result;

/// At most one instance per type identifier. No eviction.
#[derive(Default)]
pub struct InstanceCache {
    instances: HashMap<String, Box<dyn ResolverInstance>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached instance of `type_id`, constructing it on first use.
    pub fn get_or_create(
        &mut self,
        type_id: &str,
        catalog: &ClassCatalog,
        app: &AppContext,
    ) -> Result<&dyn ResolverInstance> {
        let instance = match self.instances.entry(type_id.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let instance = catalog.construct(type_id, app)?;
                tracing::debug!(type_id, "constructed resolver instance");
                e.insert(instance)
            }
        };
        Ok(&**instance)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.instances.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
