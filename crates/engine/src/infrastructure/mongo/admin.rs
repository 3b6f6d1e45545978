//! MongoDB implementation of the administrative port.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{IndexOptions, ValidationAction, ValidationLevel};
use mongodb::{Client, Database, IndexModel};
use schemaboot_domain::{CollectionName, CollectionSpec, DatabaseName, IndexSpec};

use super::json_schema::validator_document;
use crate::infrastructure::ports::{AdminError, AdminObject, SchemaAdminPort};

/// Server error code for `NamespaceExists`.
const NAMESPACE_EXISTS: i32 = 48;

/// Schema administration against one MongoDB database.
#[derive(Clone)]
pub struct MongoSchemaAdmin {
    db: Database,
}

impl MongoSchemaAdmin {
    pub fn new(client: &Client, database: &DatabaseName) -> Self {
        Self {
            db: client.database(database.as_str()),
        }
    }
}

#[async_trait]
impl SchemaAdminPort for MongoSchemaAdmin {
    async fn ping(&self) -> Result<(), AdminError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| classify("ping", AdminObject::Database, self.db.name(), e))
    }

    async fn create_collection_with_validator(
        &self,
        spec: &CollectionSpec,
    ) -> Result<(), AdminError> {
        let name = spec.name().as_str();
        self.db
            .create_collection(name)
            .validator(validator_document(spec))
            .validation_level(ValidationLevel::Strict)
            .validation_action(ValidationAction::Error)
            .await
            .map_err(|e| classify("create_collection", AdminObject::Collection, name, e))
    }

    async fn update_validator(&self, spec: &CollectionSpec) -> Result<(), AdminError> {
        let name = spec.name().as_str();
        self.db
            .run_command(doc! {
                "collMod": name,
                "validator": validator_document(spec),
                "validationLevel": "strict",
                "validationAction": "error",
            })
            .await
            .map(|_| ())
            .map_err(|e| classify("coll_mod", AdminObject::Collection, name, e))
    }

    async fn create_index(
        &self,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<String, AdminError> {
        let model = index_model(index);
        self.db
            .collection::<Document>(collection.as_str())
            .create_index(model)
            .await
            .map(|result| result.index_name)
            .map_err(|e| classify("create_index", AdminObject::Index, index.resolved_name(), e))
    }
}

/// Key pattern plus options for `createIndexes`.
pub fn index_model(index: &IndexSpec) -> IndexModel {
    let mut keys = Document::new();
    for (field, direction) in index.fields() {
        keys.insert(field.as_str(), direction.as_i32());
    }

    let mut options = IndexOptions::builder().unique(index.is_unique()).build();
    options.name = index.name().map(str::to_string);

    IndexModel::builder().keys(keys).options(options).build()
}

/// Map a driver error onto the port's error kinds.
fn classify(
    operation: &'static str,
    kind: AdminObject,
    name: impl ToString,
    err: MongoError,
) -> AdminError {
    let message = err.to_string();
    match *err.kind {
        ErrorKind::Command(ref command) if command.code == NAMESPACE_EXISTS => {
            AdminError::already_exists(kind, name)
        }
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => AdminError::connection(message),
        _ => AdminError::command(operation, message),
    }
}
