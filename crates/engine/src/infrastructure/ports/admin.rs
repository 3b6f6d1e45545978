//! Administrative port: the database engine's schema-management commands.

use async_trait::async_trait;
use schemaboot_domain::{CollectionName, CollectionSpec, IndexSpec};

use super::error::AdminError;

/// Schema-management commands against one database.
///
/// Implementations are bound to a single target database on construction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaAdminPort: Send + Sync {
    /// Verify the administrative connection is usable.
    async fn ping(&self) -> Result<(), AdminError>;

    /// Create a collection with a validator built from `spec`.
    ///
    /// Returns `AdminError::AlreadyExists` if the collection exists.
    async fn create_collection_with_validator(
        &self,
        spec: &CollectionSpec,
    ) -> Result<(), AdminError>;

    /// Replace the validator of an existing collection.
    async fn update_validator(&self, spec: &CollectionSpec) -> Result<(), AdminError>;

    /// Create an index, returning its name. Creating an identical index again succeeds.
    async fn create_index(
        &self,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<String, AdminError>;
}
