//! Unified error types for the domain layer
//!
//! Every specification type validates itself on construction and reports
//! failures through [`DomainError`], so adapters never see a half-valid spec.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid names, broken spec invariants)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects such as field types)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for invariant violations.
    ///
    /// Use this when a specification cannot be constructed:
    /// - Names are empty or contain characters the server rejects
    /// - A required field has no declared type
    /// - An index repeats a field or has no fields at all
    ///
    /// # Example
    /// ```ignore
    /// if fields.is_empty() {
    ///     return Err(DomainError::validation("Index must have at least one field"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown BSON type: varchar");
        assert!(matches!(err, DomainError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: Unknown BSON type: varchar");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").expect_err("should fail");
        let domain_err: DomainError = json_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
    }
}
