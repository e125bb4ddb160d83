// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use rolegate::prelude::*;` to get started quickly.

pub use crate::cache::{FileCache, MemoryCache, RuleCache};
pub use crate::class::{ClassCatalog, PermissionClass, ResolverInstance};
pub use crate::context::AppContext;
pub use crate::error::{PermissionError, Result};
pub use crate::permission::{
    Permission, PermissionBuilder, PermissionConfig, RuleSnapshot, SnapshotMode,
};
pub use crate::rule::{MethodRef, Outcome, ResolverRef, RuleRegistry};
