// ABOUTME: Class module - resolver types, their catalog and the instance cache.
// ABOUTME: Replaces runtime reflection with a registered dispatch table.

mod catalog;
mod instances;

pub use catalog::*;
pub use instances::*;
