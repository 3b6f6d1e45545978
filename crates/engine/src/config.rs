//! Bootstrap configuration from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MONGODB_URI` | `mongodb://localhost:27017` |
//! | `MONGODB_DATABASE` | the catalog's database (`archetype`) |
//! | `MONGODB_APP_NAME` | `schemaboot` |
//! | `MONGODB_SERVER_SELECTION_TIMEOUT_MS` | `10000` |
//! | `SCHEMA_CATALOG_PATH` | built-in catalog |
//! | `SCHEMA_REFRESH_VALIDATORS` | `false` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use schemaboot_domain::{DatabaseName, DomainError, SchemaCatalog};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_APP_NAME: &str = "schemaboot";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] DomainError),
}

impl ConfigError {
    fn invalid(var: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidValue {
            var,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub mongodb_uri: String,
    pub database: Option<DatabaseName>,
    pub app_name: String,
    pub server_selection_timeout: Duration,
    pub catalog_path: Option<PathBuf>,
    pub refresh_validators: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            server_selection_timeout: Duration::from_millis(DEFAULT_SERVER_SELECTION_TIMEOUT_MS),
            catalog_path: None,
            refresh_validators: false,
        }
    }
}

impl BootstrapConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let database = get("MONGODB_DATABASE")
            .map(|v| {
                DatabaseName::new(v.clone())
                    .map_err(|e| ConfigError::invalid("MONGODB_DATABASE", v, e))
            })
            .transpose()?;

        let server_selection_timeout = match get("MONGODB_SERVER_SELECTION_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(v.parse::<u64>().map_err(|e| {
                ConfigError::invalid("MONGODB_SERVER_SELECTION_TIMEOUT_MS", v.clone(), e)
            })?),
            None => defaults.server_selection_timeout,
        };

        let refresh_validators = match get("SCHEMA_REFRESH_VALIDATORS") {
            Some(v) => parse_flag(&v).ok_or_else(|| {
                ConfigError::invalid("SCHEMA_REFRESH_VALIDATORS", v, "expected true/false")
            })?,
            None => defaults.refresh_validators,
        };

        Ok(Self {
            mongodb_uri: get("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            database,
            app_name: get("MONGODB_APP_NAME").unwrap_or(defaults.app_name),
            server_selection_timeout,
            catalog_path: get("SCHEMA_CATALOG_PATH").map(PathBuf::from),
            refresh_validators,
        })
    }

    /// The catalog to provision: the configured file or the built-in one,
    /// retargeted at `MONGODB_DATABASE` when set.
    pub fn load_catalog(&self) -> Result<SchemaCatalog, ConfigError> {
        let catalog = match &self.catalog_path {
            Some(path) => SchemaCatalog::from_path(path)?,
            None => SchemaCatalog::archetype()?,
        };
        Ok(match &self.database {
            Some(database) => catalog.with_database(database.clone()),
            None => catalog,
        })
    }

    pub fn catalog_source(&self) -> &Path {
        self.catalog_path
            .as_deref()
            .unwrap_or_else(|| Path::new("<built-in>"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
