// ABOUTME: Defines Permission - the evaluator holding role, rules and resolver
// ABOUTME: instances, and the resolution engine behind can/has/is.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{PermissionBuilder, PermissionConfig};
use crate::cache::RuleCache;
use crate::class::{ClassCatalog, InstanceCache, PermissionClass};
use crate::context::AppContext;
use crate::error::{PermissionError, Result};
use crate::rule::{ResolverRef, RuleRegistry};

/// Split `"permission.action"` on the first dot.
///
/// The action is empty when there is no dot. Everything after the first dot
/// is the action, so `"order.create.x"` asks for `"create.x"`, not `"create"`.
pub fn split_query(query: &str) -> (&str, &str) {
    query.split_once('.').unwrap_or((query, ""))
}

/// A role-based permission evaluator.
///
/// Meant for one request or operation at a time; it has no internal
/// synchronization, so callers sharing one must serialize mutation.
pub struct Permission {
    pub(super) current_role: String,
    pub(super) app: AppContext,
    pub(super) cache: Option<Arc<dyn RuleCache>>,
    pub(super) catalog: ClassCatalog,
    pub(super) rules: RuleRegistry,
    pub(super) instances: InstanceCache,
    pub(super) config: PermissionConfig,
}

impl Permission {
    /// Create an evaluator for `role` with no cache and an empty catalog.
    pub fn new(role: impl Into<String>, app: AppContext) -> Self {
        Self::builder().role(role).app(app).build()
    }

    /// Create a new builder.
    pub fn builder() -> PermissionBuilder {
        PermissionBuilder::new()
    }

    pub fn current_role(&self) -> &str {
        &self.current_role
    }

    /// Replace the current role. Rules and cached instances are kept.
    pub fn set_current_role(&mut self, role: impl Into<String>) {
        self.current_role = role.into();
    }

    /// Whether the current role is exactly `role`.
    pub fn is(&self, role: &str) -> bool {
        self.current_role == role
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn config(&self) -> &PermissionConfig {
        &self.config
    }

    /// Make `T` available to method rules and class loading.
    pub fn register_class<T: PermissionClass>(&mut self) {
        self.catalog.register::<T>();
    }

    /// Register a resolver under `name`.
    ///
    /// Fails with [`PermissionError::DuplicateRule`] if the name exists and
    /// `overwrite` is false.
    pub fn define_rule(
        &mut self,
        name: impl Into<String>,
        resolver: impl Into<ResolverRef>,
        overwrite: bool,
    ) -> Result<()> {
        let name = name.into();
        let resolver = resolver.into();
        tracing::debug!(rule = %name, resolver = ?resolver, overwrite, "defining rule");
        self.rules.define(name, resolver, overwrite)
    }

    /// A copy of the current rule table.
    pub fn rules(&self) -> HashMap<String, ResolverRef> {
        self.rules.snapshot()
    }

    /// The resolver registered under `name`.
    pub fn rule(&self, name: &str) -> Option<&ResolverRef> {
        self.rules.get(name)
    }

    /// Decide whether the current role may use `permission`.
    ///
    /// `permission` is either `"name"` or `"name.action"`. `args` are passed
    /// to the resolver after the role, untouched.
    pub fn can(&mut self, permission: &str, args: &[Value]) -> Result<bool> {
        let (name, action) = split_query(permission);

        let resolver = self
            .rules
            .get(name)
            .ok_or_else(|| PermissionError::UndefinedPermission(name.to_string()))?;

        let outcome = match resolver {
            ResolverRef::Direct(f) => f(&self.current_role, args),
            ResolverRef::Method(m) => {
                let instance =
                    self.instances
                        .get_or_create(&m.type_id, &self.catalog, &self.app)?;
                instance
                    .call_method(&m.method, &self.current_role, args)
                    .ok_or_else(|| PermissionError::UndefinedMethod {
                        type_id: m.type_id.clone(),
                        method: m.method.clone(),
                    })?
            }
        };

        let allowed = outcome.permits(action);
        tracing::debug!(
            role = %self.current_role,
            permission = name,
            action,
            allowed,
            "permission checked"
        );
        Ok(allowed)
    }

    /// Alias of [`Permission::can`].
    pub fn has(&mut self, permission: &str, args: &[Value]) -> Result<bool> {
        self.can(permission, args)
    }
}
