//! Use cases - startup orchestration.
//!
//! Use cases drive the administrative port to fulfil one startup task each.

pub mod bootstrap;

pub use bootstrap::{BootstrapReport, CollectionOutcome, IndexOutcome, SchemaBootstrapper};
