//! Infrastructure layer - external dependency implementations.
//!
//! - `ports` - the administrative port trait and its errors
//! - `mongo` - MongoDB adapter, validator generation and offline conformance

pub mod mongo;
pub mod ports;
