//! Port traits for infrastructure boundaries.
//!
//! The administrative port is the only abstraction in the engine. Everything
//! else is concrete types. It exists so the bootstrapper can be exercised
//! against a mock as well as a live MongoDB server.

mod admin;
mod error;

pub use admin::SchemaAdminPort;
pub use error::{AdminError, AdminObject};

#[cfg(test)]
pub use admin::MockSchemaAdminPort;
