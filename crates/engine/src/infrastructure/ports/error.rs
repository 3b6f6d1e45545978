//! Error types for port operations.

use std::fmt;

/// What kind of server object an administrative command touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminObject {
    Database,
    Collection,
    Index,
}

impl fmt::Display for AdminObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "Database"),
            Self::Collection => write!(f, "Collection"),
            Self::Index => write!(f, "Index"),
        }
    }
}

/// Administrative command errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The object already exists. Non-fatal for the bootstrapper.
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: AdminObject, name: String },

    /// The administrative connection could not be established or was lost.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The server rejected the command - includes operation name for tracing.
    #[error("Command error in {operation}: {message}")]
    Command {
        operation: &'static str,
        message: String,
    },
}

impl AdminError {
    /// Create an AlreadyExists error with object kind and name context.
    pub fn already_exists(kind: AdminObject, name: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.to_string(),
        }
    }

    /// Create a Connection error.
    pub fn connection(message: impl ToString) -> Self {
        Self::Connection {
            message: message.to_string(),
        }
    }

    /// Create a Command error with operation context.
    pub fn command(operation: &'static str, message: impl ToString) -> Self {
        Self::Command {
            operation,
            message: message.to_string(),
        }
    }

    /// Check if this is an AlreadyExists error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Check if this is a Connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
