//! MongoDB database implementations.

use std::time::Duration;

use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::infrastructure::ports::AdminError;

mod admin;
pub mod conformance;
pub mod json_schema;

pub use admin::{index_model, MongoSchemaAdmin};
pub use conformance::{check_document, Violation};
pub use json_schema::validator_document;

/// Build a client for `uri`, tagging connections with `app_name`.
///
/// The driver connects lazily; use `SchemaAdminPort::ping` to verify the server.
/// `server_selection_timeout` bounds how long that first command waits.
pub async fn connect(
    uri: &str,
    app_name: &str,
    server_selection_timeout: Duration,
) -> Result<Client, AdminError> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(|e| AdminError::connection(format!("invalid MongoDB URI: {e}")))?;
    options.app_name = Some(app_name.to_string());
    options.server_selection_timeout = Some(server_selection_timeout);
    Client::with_options(options).map_err(AdminError::connection)
}
