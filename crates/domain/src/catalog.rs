//! Schema catalog: every collection and index the bootstrapper provisions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::collection::CollectionSpec;
use crate::error::DomainError;
use crate::field_type::{BsonType, FieldSpec, FieldType};
use crate::index::IndexSpec;
use crate::names::DatabaseName;

/// Default database for the built-in catalog.
pub const ARCHETYPE_DATABASE: &str = "archetype";

/// Collection the archetype services read and write pokemon documents in.
pub const POKEMON_COLLECTION: &str = "pokemons";

/// A collection together with the indexes ensured on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPlan {
    pub collection: CollectionSpec,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

impl CollectionPlan {
    pub fn new(collection: CollectionSpec) -> Self {
        Self {
            collection,
            indexes: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }
}

/// The full provisioning plan for one database.
///
/// Invariant: collection names are unique within the catalog, and no
/// collection lists two indexes with the same key pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaCatalogData", into = "SchemaCatalogData")]
pub struct SchemaCatalog {
    database: DatabaseName,
    collections: Vec<CollectionPlan>,
}

impl SchemaCatalog {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if two plans target the same
    /// collection, or one plan repeats an index key pattern.
    pub fn new(
        database: DatabaseName,
        collections: Vec<CollectionPlan>,
    ) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for plan in &collections {
            if !seen.insert(plan.collection.name()) {
                return Err(DomainError::validation(format!(
                    "Collection '{}' appears more than once in the catalog",
                    plan.collection.name()
                )));
            }
            // The server refuses a second index over the same keys.
            for (i, index) in plan.indexes.iter().enumerate() {
                if let Some(other) = plan.indexes[..i].iter().find(|o| o.has_same_keys(index)) {
                    return Err(DomainError::validation(format!(
                        "Collection '{}': indexes {} and {} share a key pattern",
                        plan.collection.name(),
                        other.resolved_name(),
                        index.resolved_name()
                    )));
                }
            }
        }
        Ok(Self {
            database,
            collections,
        })
    }

    /// The built-in catalog: a `pokemons` collection whose validator
    /// requires a string `name` and allows a string-array `types`, with a
    /// unique index on `name`.
    pub fn archetype() -> Result<Self, DomainError> {
        let pokemons = CollectionSpec::builder(POKEMON_COLLECTION)
            .field(
                "name",
                FieldSpec::new(FieldType::scalar(BsonType::String))
                    .with_description("Pokemon name - required"),
            )
            .field(
                "types",
                FieldSpec::new(FieldType::array_of(BsonType::String))
                    .with_description("Pokemon types"),
            )
            .required("name")
            .build()?;

        let plan = CollectionPlan::new(pokemons)
            .with_index(IndexSpec::ascending("name")?.with_unique(true));

        Self::new(DatabaseName::new(ARCHETYPE_DATABASE)?, vec![plan])
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::parse(format!("Cannot read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// The same plans provisioned into a different database.
    pub fn with_database(mut self, database: DatabaseName) -> Self {
        self.database = database;
        self
    }

    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    pub fn collections(&self) -> &[CollectionPlan] {
        &self.collections
    }

    /// Total number of indexes across all plans.
    pub fn index_count(&self) -> usize {
        self.collections.iter().map(|p| p.indexes.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaCatalogData {
    database: DatabaseName,
    collections: Vec<CollectionPlan>,
}

impl TryFrom<SchemaCatalogData> for SchemaCatalog {
    type Error = DomainError;

    fn try_from(data: SchemaCatalogData) -> Result<Self, Self::Error> {
        Self::new(data.database, data.collections)
    }
}

impl From<SchemaCatalog> for SchemaCatalogData {
    fn from(catalog: SchemaCatalog) -> Self {
        Self {
            database: catalog.database,
            collections: catalog.collections,
        }
    }
}
