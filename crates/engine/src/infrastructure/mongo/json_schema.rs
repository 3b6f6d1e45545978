//! `$jsonSchema` validator documents built from collection specs.

use mongodb::bson::{doc, Document};
use schemaboot_domain::{CollectionSpec, FieldName, FieldSpec, FieldType};

/// Build the `{ $jsonSchema: ... }` validator for `spec`.
///
/// `required` is omitted when empty; the server rejects an empty array there.
pub fn validator_document(spec: &CollectionSpec) -> Document {
    let mut properties = Document::new();
    for (field, field_spec) in spec.field_types() {
        properties.insert(field.as_str(), property_schema(field_spec));
    }

    let mut schema = doc! {
        "bsonType": "object",
    };
    let required: Vec<&str> = spec
        .required_fields()
        .iter()
        .map(FieldName::as_str)
        .collect();
    if !required.is_empty() {
        schema.insert("required", required);
    }
    schema.insert("properties", properties);

    doc! { "$jsonSchema": schema }
}

fn property_schema(spec: &FieldSpec) -> Document {
    let mut property = match spec.field_type {
        FieldType::Scalar(ty) => doc! { "bsonType": ty.alias() },
        FieldType::Array(ty) => doc! {
            "bsonType": "array",
            "items": { "bsonType": ty.alias() },
        },
    };
    if let Some(description) = &spec.description {
        property.insert("description", description.as_str());
    }
    property
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaboot_domain::{BsonType, SchemaCatalog};

    #[test]
    fn archetype_validator_matches_expected_shape() {
        let catalog = SchemaCatalog::archetype().expect("catalog");
        let spec = &catalog.collections()[0].collection;

        let expected = doc! {
            "$jsonSchema": {
                "bsonType": "object",
                "required": ["name"],
                "properties": {
                    "name": {
                        "bsonType": "string",
                        "description": "Pokemon name - required",
                    },
                    "types": {
                        "bsonType": "array",
                        "items": { "bsonType": "string" },
                        "description": "Pokemon types",
                    },
                },
            }
        };

        assert_eq!(validator_document(spec), expected);
    }

    #[test]
    fn omits_empty_required_list() {
        let spec = CollectionSpec::builder("trainers")
            .typed("badges", FieldType::scalar(BsonType::Int))
            .build()
            .expect("spec");

        let validator = validator_document(&spec);
        let schema = validator.get_document("$jsonSchema").expect("schema");
        assert!(!schema.contains_key("required"));
        assert_eq!(
            schema
                .get_document("properties")
                .and_then(|p| p.get_document("badges"))
                .expect("badges property"),
            &doc! { "bsonType": "int" }
        );
    }
}
