// ABOUTME: Permission module - the evaluator, its builder and configuration.
// ABOUTME: Resolves "permission[.action]" queries to allow/deny decisions.

mod builder;
mod config;
mod evaluator;
mod loader;

pub use builder::*;
pub use config::*;
pub use evaluator::*;
pub use loader::*;

#[cfg(test)]
mod evaluator_test;
