//! Schema bootstrap use case - ensures collections, validators and indexes exist.

use std::fmt;
use std::sync::Arc;

use schemaboot_domain::{CollectionName, CollectionSpec, DatabaseName, IndexSpec, SchemaCatalog};

use crate::infrastructure::ports::{AdminError, SchemaAdminPort};

/// What `ensure_collection` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOutcome {
    Created,
    AlreadyExists,
    ValidatorRefreshed,
}

impl fmt::Display for CollectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::AlreadyExists => write!(f, "already exists"),
            Self::ValidatorRefreshed => write!(f, "validator refreshed"),
        }
    }
}

/// What `ensure_index` did. Both cases leave the index in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Ensured { name: String },
    AlreadyExists { name: String },
}

impl IndexOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Ensured { name } | Self::AlreadyExists { name } => name,
        }
    }
}

impl fmt::Display for IndexOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ensured { .. } => write!(f, "ensured"),
            Self::AlreadyExists { .. } => write!(f, "already exists"),
        }
    }
}

/// Summary of one bootstrap run, printed on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub database: DatabaseName,
    pub collections: Vec<(CollectionName, CollectionOutcome)>,
    pub indexes: Vec<(CollectionName, IndexOutcome)>,
}

impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "database {}", self.database)?;
        for (collection, outcome) in &self.collections {
            writeln!(f, "  collection {}: {}", collection, outcome)?;
        }
        for (collection, index) in &self.indexes {
            writeln!(f, "  index {}.{}: {}", collection, index.name(), index)?;
        }
        Ok(())
    }
}

/// Provisions collections and indexes through the administrative port.
///
/// Calls are issued one at a time, in catalog order. "Already exists" is
/// logged and treated as success; every other error stops the run.
pub struct SchemaBootstrapper {
    admin: Arc<dyn SchemaAdminPort>,
    refresh_validators: bool,
}

impl SchemaBootstrapper {
    pub fn new(admin: Arc<dyn SchemaAdminPort>) -> Self {
        Self {
            admin,
            refresh_validators: false,
        }
    }

    /// Replace the validator of collections that already exist.
    pub fn with_refresh_validators(mut self, refresh: bool) -> Self {
        self.refresh_validators = refresh;
        self
    }

    /// Create the collection with its validator if it is absent.
    pub async fn ensure_collection(
        &self,
        spec: &CollectionSpec,
    ) -> Result<CollectionOutcome, AdminError> {
        match self.admin.create_collection_with_validator(spec).await {
            Ok(()) => {
                tracing::info!(collection = %spec.name(), "Created collection with validator");
                Ok(CollectionOutcome::Created)
            }
            Err(e) if e.is_already_exists() => {
                if self.refresh_validators {
                    self.admin.update_validator(spec).await?;
                    tracing::info!(
                        collection = %spec.name(),
                        "Refreshed validator on existing collection"
                    );
                    Ok(CollectionOutcome::ValidatorRefreshed)
                } else {
                    tracing::info!(
                        collection = %spec.name(),
                        error = %e,
                        "Collection already exists, leaving validator unchanged"
                    );
                    Ok(CollectionOutcome::AlreadyExists)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Create the index if absent. An equivalent existing index is a no-op.
    pub async fn ensure_index(
        &self,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<IndexOutcome, AdminError> {
        match self.admin.create_index(collection, index).await {
            Ok(name) => {
                tracing::info!(
                    collection = %collection,
                    index = %name,
                    unique = index.is_unique(),
                    "Index ensured"
                );
                Ok(IndexOutcome::Ensured { name })
            }
            Err(e) if e.is_already_exists() => {
                tracing::info!(
                    collection = %collection,
                    index = %index.resolved_name(),
                    error = %e,
                    "Index already exists"
                );
                Ok(IndexOutcome::AlreadyExists {
                    name: index.resolved_name(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Verify the connection, then ensure every collection and index in the catalog.
    pub async fn run(&self, catalog: &SchemaCatalog) -> Result<BootstrapReport, AdminError> {
        self.admin.ping().await?;
        tracing::debug!(database = %catalog.database(), "Administrative connection verified");

        let mut report = BootstrapReport {
            database: catalog.database().clone(),
            collections: Vec::with_capacity(catalog.collections().len()),
            indexes: Vec::with_capacity(catalog.index_count()),
        };

        for plan in catalog.collections() {
            let name = plan.collection.name();
            let outcome = self.ensure_collection(&plan.collection).await?;
            report.collections.push((name.clone(), outcome));

            for index in &plan.indexes {
                let outcome = self.ensure_index(name, index).await?;
                report.indexes.push((name.clone(), outcome));
            }
        }

        tracing::info!(
            database = %catalog.database(),
            collections = report.collections.len(),
            indexes = report.indexes.len(),
            "Schema bootstrap complete"
        );
        Ok(report)
    }
}
