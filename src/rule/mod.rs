// ABOUTME: Rule module - resolver references, outcomes and the rule registry.
// ABOUTME: Core data model for permission name to resolver mappings.

mod registry;
mod types;

pub use registry::*;
pub use types::*;
