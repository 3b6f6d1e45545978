//! Offline evaluation of a collection validator.
//!
//! Applies the same predicate the generated `$jsonSchema` enforces on the
//! server: required fields must be present, declared fields must carry the
//! declared BSON type, and array elements must match the element type.
//! Undeclared fields are allowed.

use std::fmt;

use mongodb::bson::{Bson, Document};
use schemaboot_domain::{BsonType, CollectionSpec, FieldName, FieldType};

/// One reason a document would be rejected by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingRequired {
        field: FieldName,
    },
    TypeMismatch {
        field: FieldName,
        expected: FieldType,
        found: &'static str,
    },
    ItemTypeMismatch {
        field: FieldName,
        position: usize,
        expected: BsonType,
        found: &'static str,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { field } => write!(f, "missing required field '{}'", field),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{}' expected {}, found {}", field, expected, found),
            Self::ItemTypeMismatch {
                field,
                position,
                expected,
                found,
            } => write!(
                f,
                "field '{}' item {} expected {}, found {}",
                field, position, expected, found
            ),
        }
    }
}

/// Check `document` against `spec`, collecting every violation.
pub fn check_document(spec: &CollectionSpec, document: &Document) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    for field in spec.required_fields() {
        if !document.contains_key(field.as_str()) {
            violations.push(Violation::MissingRequired {
                field: field.clone(),
            });
        }
    }

    for (field, field_spec) in spec.field_types() {
        let Some(value) = document.get(field.as_str()) else {
            continue;
        };
        match (field_spec.field_type, value) {
            (FieldType::Array(expected), Bson::Array(items)) => {
                for (position, item) in items.iter().enumerate() {
                    if !matches_type(expected, item) {
                        violations.push(Violation::ItemTypeMismatch {
                            field: field.clone(),
                            position,
                            expected,
                            found: type_name(item),
                        });
                    }
                }
            }
            (FieldType::Scalar(expected), value) if matches_type(expected, value) => {}
            (expected, value) => violations.push(Violation::TypeMismatch {
                field: field.clone(),
                expected,
                found: type_name(value),
            }),
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn matches_type(expected: BsonType, value: &Bson) -> bool {
    matches!(
        (expected, value),
        (BsonType::String, Bson::String(_))
            | (BsonType::Int, Bson::Int32(_))
            | (BsonType::Long, Bson::Int64(_))
            | (BsonType::Double, Bson::Double(_))
            | (BsonType::Decimal, Bson::Decimal128(_))
            | (BsonType::Bool, Bson::Boolean(_))
            | (BsonType::Date, Bson::DateTime(_))
            | (BsonType::ObjectId, Bson::ObjectId(_))
            | (BsonType::Object, Bson::Document(_))
            | (BsonType::BinData, Bson::Binary(_))
    )
}

fn type_name(value: &Bson) -> &'static str {
    match value {
        Bson::String(_) => "string",
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::Double(_) => "double",
        Bson::Decimal128(_) => "decimal",
        Bson::Boolean(_) => "bool",
        Bson::DateTime(_) => "date",
        Bson::ObjectId(_) => "objectId",
        Bson::Document(_) => "object",
        Bson::Binary(_) => "binData",
        Bson::Array(_) => "array",
        Bson::Null => "null",
        _ => "other",
    }
}
