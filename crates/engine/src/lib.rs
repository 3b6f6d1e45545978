//! schemaboot Engine library.
//!
//! Ensures MongoDB collections, validators and indexes exist at startup.
//!
//! ## Structure
//!
//! - `use_cases/` - the schema bootstrapper
//! - `infrastructure/` - the administrative port and its MongoDB adapter
//! - `config` - environment configuration

pub mod config;
pub mod infrastructure;
pub mod use_cases;

/// E2E integration tests using real MongoDB via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use config::BootstrapConfig;
pub use use_cases::SchemaBootstrapper;
