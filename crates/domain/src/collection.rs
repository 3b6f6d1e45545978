//! Collection specification: the shape a collection's validator enforces.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::DomainError;
use crate::field_type::{FieldSpec, FieldType};
use crate::names::{CollectionName, FieldName};

/// A collection and the validator attached to it on creation.
///
/// Invariant: every required field has a declared type
/// (`required_fields ⊆ keys(field_types)`), and every field is a top-level
/// key rather than a dotted path. The spec is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CollectionSpecData", into = "CollectionSpecData")]
pub struct CollectionSpec {
    name: CollectionName,
    required_fields: BTreeSet<FieldName>,
    field_types: BTreeMap<FieldName, FieldSpec>,
}

impl CollectionSpec {
    /// Create a collection spec, checking the required-fields invariant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the first dotted field, or
    /// the first required field that has no declared type.
    pub fn new(
        name: CollectionName,
        required_fields: BTreeSet<FieldName>,
        field_types: BTreeMap<FieldName, FieldSpec>,
    ) -> Result<Self, DomainError> {
        // `$jsonSchema` properties match literal keys, so a dotted name
        // would never match the nested value it appears to describe.
        if let Some(path) = field_types
            .keys()
            .chain(required_fields.iter())
            .find(|field| field.is_path())
        {
            return Err(DomainError::validation(format!(
                "Collection '{}': field '{}' is a dotted path, not a top-level key",
                name, path
            )));
        }
        if let Some(missing) = required_fields
            .iter()
            .find(|field| !field_types.contains_key(*field))
        {
            return Err(DomainError::validation(format!(
                "Collection '{}': required field '{}' has no declared type",
                name, missing
            )));
        }
        Ok(Self {
            name,
            required_fields,
            field_types,
        })
    }

    /// Start building a spec for the named collection.
    pub fn builder(name: impl Into<String>) -> CollectionSpecBuilder {
        CollectionSpecBuilder {
            name: name.into(),
            required: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    pub fn required_fields(&self) -> &BTreeSet<FieldName> {
        &self.required_fields
    }

    pub fn field_types(&self) -> &BTreeMap<FieldName, FieldSpec> {
        &self.field_types
    }
}

/// Collects raw names and types, validating everything in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct CollectionSpecBuilder {
    name: String,
    required: Vec<String>,
    fields: Vec<(String, FieldSpec)>,
}

impl CollectionSpecBuilder {
    /// Declare an optional field.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// Declare a field with a bare type and no description.
    pub fn typed(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(name, FieldSpec::new(field_type))
    }

    /// Mark a field as required. The field must also be declared.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Validate names and the required-fields invariant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any name is invalid, a field is
    /// declared twice, or a required field is undeclared.
    pub fn build(self) -> Result<CollectionSpec, DomainError> {
        let name = CollectionName::new(self.name)?;

        let mut field_types = BTreeMap::new();
        for (field, spec) in self.fields {
            let field = FieldName::new(field)?;
            if field_types.contains_key(&field) {
                return Err(DomainError::validation(format!(
                    "Collection '{}': field '{}' declared twice",
                    name, field
                )));
            }
            field_types.insert(field, spec);
        }

        let required_fields = self
            .required
            .into_iter()
            .map(FieldName::new)
            .collect::<Result<BTreeSet<_>, _>>()?;

        CollectionSpec::new(name, required_fields, field_types)
    }
}

/// Wire form used by catalog files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionSpecData {
    name: CollectionName,
    #[serde(default)]
    required: BTreeSet<FieldName>,
    #[serde(default, deserialize_with = "unique_properties")]
    properties: BTreeMap<FieldName, FieldSpec>,
}

/// Deserialize `properties`, rejecting a field declared twice instead of
/// letting the last declaration win.
fn unique_properties<'de, D>(deserializer: D) -> Result<BTreeMap<FieldName, FieldSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = BTreeMap<FieldName, FieldSpec>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field names to field specs")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut properties = BTreeMap::new();
            while let Some((field, spec)) = map.next_entry::<FieldName, FieldSpec>()? {
                if properties.contains_key(&field) {
                    return Err(de::Error::custom(DomainError::validation(format!(
                        "property '{}' declared twice",
                        field
                    ))));
                }
                properties.insert(field, spec);
            }
            Ok(properties)
        }
    }

    deserializer.deserialize_map(PropertiesVisitor)
}

impl TryFrom<CollectionSpecData> for CollectionSpec {
    type Error = DomainError;

    fn try_from(data: CollectionSpecData) -> Result<Self, Self::Error> {
        Self::new(data.name, data.required, data.properties)
    }
}

impl From<CollectionSpec> for CollectionSpecData {
    fn from(spec: CollectionSpec) -> Self {
        Self {
            name: spec.name,
            required: spec.required_fields,
            properties: spec.field_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_type::BsonType;

    #[test]
    fn builds_spec_with_required_subset() {
        let spec = CollectionSpec::builder("pokemons")
            .typed("name", FieldType::scalar(BsonType::String))
            .typed("types", FieldType::array_of(BsonType::String))
            .required("name")
            .build()
            .expect("valid spec");

        assert_eq!(spec.name().as_str(), "pokemons");
        assert_eq!(spec.field_types().len(), 2);
        let required: Vec<&str> = spec.required_fields().iter().map(FieldName::as_str).collect();
        assert_eq!(required, vec!["name"]);
    }

    #[test]
    fn rejects_required_field_without_type() {
        let err = CollectionSpec::builder("pokemons")
            .typed("name", FieldType::scalar(BsonType::String))
            .required("level")
            .build()
            .expect_err("should fail");

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("'level'"));
    }

    #[test]
    fn rejects_duplicate_field_declaration() {
        let err = CollectionSpec::builder("pokemons")
            .typed("name", FieldType::scalar(BsonType::String))
            .typed("name", FieldType::scalar(BsonType::Int))
            .build()
            .expect_err("should fail");

        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn deserialization_enforces_invariant() {
        let json = r#"{
            "name": "pokemons",
            "required": ["name", "shiny"],
            "properties": { "name": { "type": "string" } }
        }"#;
        let err = serde_json::from_str::<CollectionSpec>(json).expect_err("should fail");
        assert!(err.to_string().contains("shiny"));
    }

    #[test]
    fn deserialization_rejects_property_declared_twice() {
        let json = r#"{
            "name": "pokemons",
            "properties": {
                "name": { "type": "string" },
                "name": { "type": "int" }
            }
        }"#;
        let err = serde_json::from_str::<CollectionSpec>(json).expect_err("should fail");
        assert!(err.to_string().contains("property 'name' declared twice"));
    }

    #[test]
    fn rejects_dotted_field_names() {
        let err = CollectionSpec::builder("pokemons")
            .typed("stats", FieldType::scalar(BsonType::Object))
            .typed("stats.hp", FieldType::scalar(BsonType::Int))
            .build()
            .expect_err("should fail");
        assert!(err.to_string().contains("'stats.hp' is a dotted path"));

        let json = r#"{
            "name": "pokemons",
            "required": ["stats.hp"],
            "properties": { "stats.hp": { "type": "int" } }
        }"#;
        assert!(serde_json::from_str::<CollectionSpec>(json).is_err());
    }

    #[test]
    fn serializes_with_catalog_field_names() {
        let spec = CollectionSpec::builder("trainers")
            .typed("badges", FieldType::scalar(BsonType::Int))
            .build()
            .expect("valid spec");

        let value = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(value["name"], "trainers");
        assert_eq!(value["properties"]["badges"]["type"], "int");
        assert_eq!(value["required"], serde_json::json!([]));
    }
}
