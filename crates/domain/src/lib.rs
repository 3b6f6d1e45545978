//! schemaboot domain: pure specification types for schema provisioning.
//!
//! Nothing here performs I/O against a database. Types validate their own
//! invariants on construction (and on deserialization) so adapters only
//! ever receive well-formed collection and index specs.

pub mod catalog;
pub mod collection;
pub mod error;
pub mod field_type;
pub mod index;
pub mod names;

pub use catalog::{CollectionPlan, SchemaCatalog, ARCHETYPE_DATABASE, POKEMON_COLLECTION};
pub use collection::{CollectionSpec, CollectionSpecBuilder};
pub use error::DomainError;
pub use field_type::{BsonType, FieldSpec, FieldType};
pub use index::{IndexSpec, SortDirection};
pub use names::{CollectionName, DatabaseName, FieldName};
