//! Typed rejection reasons for registry operations.
//!
//! Every rejected operation leaves registry state unchanged; the caller
//! surfaces the reason to the operator and nothing else happens.

use thiserror::Error;

/// Validation failure for a registry operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An entity with this (normalized) name or id already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The operation would break a registry invariant.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// No entity with this name or id.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(
            RegistryError::AlreadyExists("tripod".to_string()).to_string(),
            "Already exists: tripod"
        );
        assert_eq!(
            RegistryError::NotFound("wave".to_string()).to_string(),
            "Not found: wave"
        );
    }
}
