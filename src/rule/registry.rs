// ABOUTME: Implements the RuleRegistry - the table mapping permission names
// ABOUTME: to resolvers, with overwrite protection on explicit definition.

use std::collections::HashMap;

use super::ResolverRef;
use crate::error::{PermissionError, Result};

/// Mapping from permission name to resolver.
///
/// Owned by one evaluator; not synchronized.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, ResolverRef>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resolver` under `name`.
    ///
    /// Fails with [`PermissionError::DuplicateRule`] when the name is taken
    /// and `overwrite` is false.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        resolver: ResolverRef,
        overwrite: bool,
    ) -> Result<()> {
        let name = name.into();
        if !overwrite && self.rules.contains_key(&name) {
            return Err(PermissionError::DuplicateRule(name));
        }
        self.rules.insert(name, resolver);
        Ok(())
    }

    /// Get the resolver registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ResolverRef> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Insert every entry, overwriting same-named rules.
    pub fn merge<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, ResolverRef)>,
    {
        self.rules.extend(entries);
    }

    /// Discard all current rules and install `entries` instead.
    pub fn replace<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, ResolverRef)>,
    {
        self.rules = entries.into_iter().collect();
    }

    /// A copy of the current mapping. Later mutations are not reflected.
    pub fn snapshot(&self) -> HashMap<String, ResolverRef> {
        self.rules.clone()
    }

    /// List all rule names, sorted alphabetically.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.rules.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
