// ABOUTME: Defines PermissionClass and the ClassCatalog - a static dispatch table
// ABOUTME: mapping type identifiers to factories and their public operations.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::context::AppContext;
use crate::error::{PermissionError, Result};
use crate::rule::Outcome;

/// A resolver type whose public operations can be loaded as rules.
///
/// `METHODS` lists every public operation, reserved-prefixed ones included;
/// the loader decides which of them become rules.
pub trait PermissionClass: Send + Sync + 'static {
    /// Identifier under which the type is catalogued and cached.
    const TYPE_ID: &'static str;

    /// Names of all public operations.
    const METHODS: &'static [&'static str];

    /// Build an instance from the ambient application context.
    fn construct(app: &AppContext) -> Self
    where
        Self: Sized;

    /// Run `method` with the current role and extra arguments.
    ///
    /// Returns `None` if the type has no such operation.
    fn invoke(&self, method: &str, role: &str, args: &[Value]) -> Option<Outcome>;
}

/// Object-safe view of a constructed resolver.
pub trait ResolverInstance: Send + Sync {
    fn call_method(&self, method: &str, role: &str, args: &[Value]) -> Option<Outcome>;
}

impl<T: PermissionClass> ResolverInstance for T {
    fn call_method(&self, method: &str, role: &str, args: &[Value]) -> Option<Outcome> {
        self.invoke(method, role, args)
    }
}

type Factory = fn(&AppContext) -> Box<dyn ResolverInstance>;

fn construct_boxed<T: PermissionClass>(app: &AppContext) -> Box<dyn ResolverInstance> {
    Box::new(T::construct(app))
}

struct ClassEntry {
    methods: &'static [&'static str],
    factory: Factory,
}

/// Registry of resolver types known to an evaluator.
#[derive(Default)]
pub struct ClassCatalog {
    classes: HashMap<String, ClassEntry>,
}

impl ClassCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `T::TYPE_ID`. Re-registering replaces the entry.
    pub fn register<T: PermissionClass>(&mut self) {
        self.classes.insert(
            T::TYPE_ID.to_string(),
            ClassEntry {
                methods: T::METHODS,
                factory: construct_boxed::<T>,
            },
        );
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.classes.contains_key(type_id)
    }

    /// Public operations of `type_id`.
    pub fn methods(&self, type_id: &str) -> Result<&'static [&'static str]> {
        self.entry(type_id).map(|e| e.methods)
    }

    /// Build a fresh instance of `type_id`.
    pub fn construct(
        &self,
        type_id: &str,
        app: &AppContext,
    ) -> Result<Box<dyn ResolverInstance>> {
        self.entry(type_id).map(|e| (e.factory)(app))
    }

    /// List all type identifiers, sorted alphabetically.
    pub fn type_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.classes.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn entry(&self, type_id: &str) -> Result<&ClassEntry> {
        self.classes
            .get(type_id)
            .ok_or_else(|| PermissionError::Reflection(type_id.to_string()))
    }
}

impl fmt::Debug for ClassCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassCatalog")
            .field("types", &self.type_ids())
            .finish()
    }
}
