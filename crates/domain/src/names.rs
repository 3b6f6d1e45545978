//! Validated name newtypes for database objects
//!
//! These newtypes ensure that names are accepted by the server by construction:
//! - Non-empty
//! - Free of the characters MongoDB reserves for each kind of name
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// MongoDB limits database names to fewer than 64 bytes.
const MAX_DATABASE_NAME_BYTES: usize = 63;

/// Characters MongoDB rejects in database names (on any platform).
const DATABASE_NAME_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];

/// Collections with this prefix are owned by the server.
const SYSTEM_COLLECTION_PREFIX: &str = "system.";

fn trimmed_non_empty(value: String, kind: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{kind} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// DatabaseName
// ============================================================================

/// A validated database name (non-empty, <64 bytes, no `/\. "$` or NUL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Create a new validated database name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name is 64 bytes or longer
    /// - The name contains a character MongoDB forbids in database names
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = trimmed_non_empty(name.into(), "Database name")?;
        if name.len() > MAX_DATABASE_NAME_BYTES {
            return Err(DomainError::validation(format!(
                "Database name cannot exceed {} bytes",
                MAX_DATABASE_NAME_BYTES
            )));
        }
        if let Some(c) = name.chars().find(|c| DATABASE_NAME_FORBIDDEN.contains(c)) {
            return Err(DomainError::validation(format!(
                "Database name '{}' contains forbidden character {:?}",
                name, c
            )));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DatabaseName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DatabaseName> for String {
    fn from(name: DatabaseName) -> String {
        name.0
    }
}

// ============================================================================
// CollectionName
// ============================================================================

/// A validated collection name (non-empty, no `$` or NUL, not `system.*`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new validated collection name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name contains `$` or a NUL character
    /// - The name starts with the reserved `system.` prefix
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = trimmed_non_empty(name.into(), "Collection name")?;
        if name.contains('$') || name.contains('\0') {
            return Err(DomainError::validation(format!(
                "Collection name '{}' cannot contain '$' or NUL",
                name
            )));
        }
        if name.starts_with(SYSTEM_COLLECTION_PREFIX) {
            return Err(DomainError::validation(format!(
                "Collection name '{}' uses the reserved '{}' prefix",
                name, SYSTEM_COLLECTION_PREFIX
            )));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> String {
        name.0
    }
}

// ============================================================================
// FieldName
// ============================================================================

/// A validated document field name (non-empty, no leading `$`, no NUL).
///
/// Index keys may be dotted paths into embedded documents (`stats.hp`);
/// collection validators only accept top-level names, see [`is_path`](Self::is_path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Create a new validated field name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name starts with `$` (reserved for operators)
    /// - The name contains a NUL character
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = trimmed_non_empty(name.into(), "Field name")?;
        if name.starts_with('$') {
            return Err(DomainError::validation(format!(
                "Field name '{}' cannot start with '$'",
                name
            )));
        }
        if name.contains('\0') {
            return Err(DomainError::validation("Field name cannot contain NUL"));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this names a nested field (`stats.hp`) rather than a top-level key.
    pub fn is_path(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FieldName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> String {
        name.0
    }
}
