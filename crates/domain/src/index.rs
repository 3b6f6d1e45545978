//! Index specification.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::DomainError;
use crate::names::FieldName;

/// Sort direction of one key in an index pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// The value used in key patterns (`1` / `-1`).
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl TryFrom<i32> for SortDirection {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            -1 => Ok(Self::Descending),
            other => Err(DomainError::parse(format!(
                "Sort direction must be 1 or -1, got {}",
                other
            ))),
        }
    }
}

impl From<SortDirection> for i32 {
    fn from(direction: SortDirection) -> i32 {
        direction.as_i32()
    }
}

/// An index over an ordered list of keys.
///
/// Invariant: at least one key, and no field appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexSpecData", into = "IndexSpecData")]
pub struct IndexSpec {
    fields: Vec<(FieldName, SortDirection)>,
    unique: bool,
    name: Option<String>,
}

impl IndexSpec {
    /// Create an index over `fields` in order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `fields` is empty or repeats a field.
    pub fn new(fields: Vec<(FieldName, SortDirection)>) -> Result<Self, DomainError> {
        if fields.is_empty() {
            return Err(DomainError::validation("Index must have at least one field"));
        }
        let mut seen = HashSet::new();
        if let Some((dup, _)) = fields.iter().find(|(field, _)| !seen.insert(field)) {
            return Err(DomainError::validation(format!(
                "Index repeats field '{}'",
                dup
            )));
        }
        Ok(Self {
            fields,
            unique: false,
            name: None,
        })
    }

    /// Single-field ascending index, the most common case.
    pub fn ascending(field: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(vec![(FieldName::new(field)?, SortDirection::Ascending)])
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Override the server's default index name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank after trimming.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Index name cannot be blank"));
        }
        self.name = Some(name);
        Ok(self)
    }

    pub fn fields(&self) -> &[(FieldName, SortDirection)] {
        &self.fields
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The explicit name, or the server's default (`name_1`, `a_1_b_-1`).
    pub fn resolved_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .fields
                .iter()
                .map(|(field, dir)| format!("{}_{}", field, dir.as_i32()))
                .collect::<Vec<_>>()
                .join("_"),
        }
    }

    /// Whether both indexes use the same ordered key pattern.
    pub fn has_same_keys(&self, other: &IndexSpec) -> bool {
        self.fields == other.fields
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolved_name())?;
        if self.unique {
            write!(f, " (unique)")?;
        }
        Ok(())
    }
}

/// Wire form used by catalog files: `{"keys": [["name", 1]], "unique": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexSpecData {
    keys: Vec<(FieldName, SortDirection)>,
    #[serde(default)]
    unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl TryFrom<IndexSpecData> for IndexSpec {
    type Error = DomainError;

    fn try_from(data: IndexSpecData) -> Result<Self, Self::Error> {
        let spec = Self::new(data.keys)?.with_unique(data.unique);
        match data.name {
            Some(name) => spec.with_name(name),
            None => Ok(spec),
        }
    }
}

impl From<IndexSpec> for IndexSpecData {
    fn from(spec: IndexSpec) -> Self {
        Self {
            keys: spec.fields,
            unique: spec.unique,
            name: spec.name,
        }
    }
}
