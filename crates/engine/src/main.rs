//! schemaboot - ensure the archetype MongoDB schema, then exit.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schemaboot_engine::infrastructure::mongo::{self, MongoSchemaAdmin};
use schemaboot_engine::{BootstrapConfig, SchemaBootstrapper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries only the completion message.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schemaboot_engine=info,schemaboot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BootstrapConfig::from_env().context("invalid configuration")?;
    let catalog = config.load_catalog().with_context(|| {
        format!("failed to load catalog from {}", config.catalog_source().display())
    })?;

    tracing::info!(
        database = %catalog.database(),
        catalog = %config.catalog_source().display(),
        collections = catalog.collections().len(),
        "Starting schema bootstrap"
    );

    let client = mongo::connect(
        &config.mongodb_uri,
        &config.app_name,
        config.server_selection_timeout,
    )
    .await
    .context("failed to configure MongoDB client")?;
    let admin = Arc::new(MongoSchemaAdmin::new(&client, catalog.database()));

    let report = SchemaBootstrapper::new(admin)
        .with_refresh_validators(config.refresh_validators)
        .run(&catalog)
        .await
        .with_context(|| format!("schema bootstrap failed for database {}", catalog.database()))?;

    print!("{report}");
    println!(
        "MongoDB initialization completed for {} database",
        catalog.database()
    );

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
