// ABOUTME: Defines the error type for the rolegate library using thiserror.
// ABOUTME: Covers rule definition, permission resolution and reflection failures.

/// Errors raised by rule definition, loading and permission checks.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// A rule with this name already exists and overwrite was not requested.
    #[error("Rule already defined: {0}")]
    DuplicateRule(String),

    /// `can`/`has` was asked about a permission with no registered resolver.
    #[error("Permission not defined: {0}")]
    UndefinedPermission(String),

    /// The type identifier is not present in the class catalog.
    #[error("Reflection error: type '{0}' is not registered")]
    Reflection(String),

    /// A method rule names an operation the type does not expose.
    #[error("Method '{method}' not found on type '{type_id}'")]
    UndefinedMethod { type_id: String, method: String },

    /// A `Type->method` string could not be parsed.
    #[error("Invalid method reference: '{0}' (expected 'Type->method')")]
    InvalidMethodRef(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PermissionError>;
