// ABOUTME: Root module for rolegate - a role-based permission evaluator.
// ABOUTME: Re-exports all public types from submodules.

pub mod cache;
pub mod class;
pub mod context;
pub mod error;
pub mod permission;
pub mod prelude;
pub mod rule;

pub use error::PermissionError;
pub use permission::Permission;
