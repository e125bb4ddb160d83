// ABOUTME: Defines rule types - resolver references, method references, outcomes.
// ABOUTME: Outcome interpretation turns a resolver result into an allow/deny decision.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PermissionError;

/// Separator used by the textual `Type->method` form.
pub const METHOD_SEPARATOR: &str = "->";

/// A direct resolver callable: receives the current role and extra arguments.
pub type ResolverFn = Arc<dyn Fn(&str, &[Value]) -> Outcome + Send + Sync>;

/// What a resolver returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A plain decision; any action suffix is ignored.
    Allowed(bool),

    /// The action names the caller may perform.
    Actions(Vec<String>),

    /// Anything else. Always denies.
    Unsupported,
}

impl Outcome {
    /// Decide whether `action` is permitted by this outcome.
    ///
    /// An empty action never matches an action list.
    pub fn permits(&self, action: &str) -> bool {
        match self {
            Outcome::Allowed(allowed) => *allowed,
            Outcome::Actions(actions) => {
                !action.is_empty() && actions.iter().any(|a| a == action)
            }
            Outcome::Unsupported => false,
        }
    }
}

impl From<bool> for Outcome {
    fn from(allowed: bool) -> Self {
        Outcome::Allowed(allowed)
    }
}

impl From<Vec<String>> for Outcome {
    fn from(actions: Vec<String>) -> Self {
        Outcome::Actions(actions)
    }
}

impl From<Vec<&str>> for Outcome {
    fn from(actions: Vec<&str>) -> Self {
        Outcome::Actions(actions.into_iter().map(String::from).collect())
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Outcome::Allowed(b),
            // Non-string elements can never equal an action name.
            Value::Array(items) => Outcome::Actions(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => Outcome::Unsupported,
        }
    }
}

/// Reference to a named operation on a catalogued resolver type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub type_id: String,
    pub method: String,
}

impl MethodRef {
    pub fn new(type_id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.type_id, METHOD_SEPARATOR, self.method)
    }
}

impl FromStr for MethodRef {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (type_id, method) = s
            .split_once(METHOD_SEPARATOR)
            .ok_or_else(|| PermissionError::InvalidMethodRef(s.to_string()))?;
        if type_id.is_empty() || method.is_empty() || method.contains(METHOD_SEPARATOR) {
            return Err(PermissionError::InvalidMethodRef(s.to_string()));
        }
        Ok(Self::new(type_id, method))
    }
}

/// How a rule resolves: a callable, or a method on a catalogued type.
#[derive(Clone)]
pub enum ResolverRef {
    Direct(ResolverFn),
    Method(MethodRef),
}

impl ResolverRef {
    /// Wrap a closure as a direct resolver.
    pub fn direct<F, O>(f: F) -> Self
    where
        F: Fn(&str, &[Value]) -> O + Send + Sync + 'static,
        O: Into<Outcome>,
    {
        ResolverRef::Direct(Arc::new(move |role, args| f(role, args).into()))
    }

    /// Reference `type_id->method`.
    pub fn method(type_id: impl Into<String>, method: impl Into<String>) -> Self {
        ResolverRef::Method(MethodRef::new(type_id, method))
    }
}

impl From<MethodRef> for ResolverRef {
    fn from(m: MethodRef) -> Self {
        ResolverRef::Method(m)
    }
}

impl fmt::Debug for ResolverRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverRef::Direct(_) => f.write_str("Direct(<fn>)"),
            ResolverRef::Method(m) => write!(f, "Method({})", m),
        }
    }
}

impl PartialEq for ResolverRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResolverRef::Direct(a), ResolverRef::Direct(b)) => Arc::ptr_eq(a, b),
            (ResolverRef::Method(a), ResolverRef::Method(b)) => a == b,
            _ => false,
        }
    }
}
