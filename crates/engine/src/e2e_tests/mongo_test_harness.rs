//! MongoDB test harness for E2E testing.
//!
//! Provides testcontainer-based MongoDB instance management for integration tests.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::Client;
use schemaboot_domain::{DatabaseName, SchemaCatalog};
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};
use tokio::time::sleep;
use uuid::Uuid;

use crate::infrastructure::mongo;

/// MongoDB test harness managing container lifecycle.
pub struct MongoTestHarness {
    _container: ContainerAsync<GenericImage>,
    client: Client,
}

impl MongoTestHarness {
    /// Start a new MongoDB container and establish a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or connection cannot be established.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container: ContainerAsync<GenericImage> = mongo_image().start().await;
        let port = container.get_host_port_ipv4(27017).await;
        let uri = format!("mongodb://127.0.0.1:{port}/?directConnection=true");

        let client = connect_with_retry(&uri).await?;

        Ok(Self {
            _container: container,
            client,
        })
    }

    /// Get reference to the MongoDB client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Create a single-node MongoDB container image.
///
/// Readiness is verified by connect_with_retry rather than log parsing.
pub fn mongo_image() -> GenericImage {
    GenericImage::new("mongo", "7.0")
        .with_exposed_port(27017)
        .with_wait_for(WaitFor::seconds(2))
}

/// Connect to MongoDB with retry logic using exponential backoff.
///
/// Features:
/// - Exponential backoff: 250ms → 500ms → 1s → 2s (capped)
/// - Connection verification with a `ping`
/// - Up to 30 attempts
pub async fn connect_with_retry(
    uri: &str,
) -> Result<Client, Box<dyn std::error::Error + Send + Sync>> {
    let max_attempts = 30;
    let initial_delay = Duration::from_millis(250);
    let max_delay = Duration::from_secs(2);

    let mut attempt = 0;
    let mut delay = initial_delay;
    let mut last_err: Option<String> = None;

    while attempt < max_attempts {
        attempt += 1;

        match mongo::connect(uri, "schemaboot-tests", Duration::from_secs(2)).await {
            Ok(client) => match client.database("admin").run_command(doc! { "ping": 1 }).await {
                Ok(_) => {
                    tracing::info!(
                        attempt = attempt,
                        uri = uri,
                        "MongoDB connection established and verified"
                    );
                    return Ok(client);
                }
                Err(e) => {
                    last_err = Some(format!("Ping failed: {e}"));
                }
            },
            Err(e) => {
                last_err = Some(e.to_string());
            }
        }

        tracing::debug!(
            attempt = attempt,
            delay_ms = delay.as_millis(),
            error = last_err.as_deref().unwrap_or("unknown"),
            "Retrying MongoDB connection"
        );

        sleep(delay).await;
        delay = std::cmp::min(delay.saturating_mul(2), max_delay);
    }

    Err(format!(
        "Failed to connect to MongoDB at {uri} after {max_attempts} attempts: {:?}",
        last_err
    )
    .into())
}

/// A fresh database name so tests never observe each other's collections.
pub fn unique_database() -> DatabaseName {
    DatabaseName::new(format!("schemaboot_{}", Uuid::new_v4().simple()))
        .expect("generated database name is valid")
}

/// The built-in catalog retargeted at a fresh database.
pub fn archetype_catalog() -> SchemaCatalog {
    SchemaCatalog::archetype()
        .expect("built-in catalog is valid")
        .with_database(unique_database())
}
