//! Backend E2E integration tests.
//!
//! These tests run the schema bootstrapper against a real MongoDB server
//! (via testcontainers) and then probe the server: stored validators,
//! index names, and which inserts the validator and unique index reject.
//!
//! # Running E2E Tests
//!
//! ```bash
//! # Run all E2E tests (requires Docker)
//! cargo test -p schemaboot-engine --lib e2e_tests -- --ignored --test-threads=1
//!
//! # Run specific test
//! cargo test -p schemaboot-engine --lib unique_index_rejects_duplicate_names -- --ignored
//! ```

mod bootstrap_tests;
mod mongo_test_harness;

pub use mongo_test_harness::*;
