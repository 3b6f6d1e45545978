//! Declared field types for collection validators.
//!
//! Textual forms use MongoDB's `bsonType` aliases, so `string` and
//! `array<string>` read the same way in catalog files as they do on the server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A primitive BSON type a validator can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType {
    String,
    Int,
    Long,
    Double,
    Decimal,
    Bool,
    Date,
    ObjectId,
    Object,
    BinData,
}

impl BsonType {
    pub const ALL: [BsonType; 10] = [
        Self::String,
        Self::Int,
        Self::Long,
        Self::Double,
        Self::Decimal,
        Self::Bool,
        Self::Date,
        Self::ObjectId,
        Self::Object,
        Self::BinData,
    ];

    /// The `bsonType` alias understood by `$jsonSchema`.
    pub fn alias(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::ObjectId => "objectId",
            Self::Object => "object",
            Self::BinData => "binData",
        }
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

impl FromStr for BsonType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.alias() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown BSON type: {}", s)))
    }
}

/// The declared type of a field: a primitive, or an array of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Scalar(BsonType),
    Array(BsonType),
}

impl FieldType {
    pub fn scalar(ty: BsonType) -> Self {
        Self::Scalar(ty)
    }

    pub fn array_of(ty: BsonType) -> Self {
        Self::Array(ty)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{}", ty),
            Self::Array(ty) => write!(f, "array<{}>", ty),
        }
    }
}

impl FromStr for FieldType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("array<").and_then(|rest| rest.strip_suffix('>')) {
            Some(inner) => Ok(Self::Array(inner.parse()?)),
            None if s == "array" => Err(DomainError::parse(
                "Array fields must declare an element type, e.g. array<string>",
            )),
            None => Ok(Self::Scalar(s.parse()?)),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> String {
        ty.to_string()
    }
}

/// A field's declared type plus the description the validator reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
