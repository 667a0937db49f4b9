//! Error types for tabledoc.
//!
//! Connection strings carry passwords, so no variant here ever embeds one
//! except `Format`, which echoes the rejected input back to the caller who
//! typed it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabledoc operations.
#[derive(Debug, Error)]
pub enum TableDocError {
    /// Credentials file could not be read or parsed
    #[error("Configuration error: cannot load credentials file '{}'", path.display())]
    Config {
        /// Path of the credentials file
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Connection string does not have the `user:pass@tcp(host:port)/database` shape
    #[error("Invalid data source name format: {dsn}")]
    Format {
        /// The rejected input
        dsn: String,
    },

    /// Database connection failed (credentials sanitized)
    #[error("Database connection failed: {context}")]
    Connection {
        /// Redacted description of the connection target
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A statement failed to execute or its rows could not be decoded
    #[error("Query failed: {statement}")]
    Query {
        /// The statement text
        statement: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid or missing command-line value
    #[error("Usage error: {message}")]
    Usage {
        /// What was wrong with the invocation
        message: String,
    },

    /// Writing the report failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// What was being written
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The tracing subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    Logging {
        /// Subscriber error text
        message: String,
    },
}

/// Convenience type alias for Results with `TableDocError`
pub type Result<T> = std::result::Result<T, TableDocError>;

impl TableDocError {
    /// Creates a configuration error for a credentials file
    pub fn config<E>(path: impl Into<PathBuf>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            path: path.into(),
            source: Box::new(error),
        }
    }

    /// Creates a format error carrying the rejected connection string
    pub fn format(dsn: impl Into<String>) -> Self {
        Self::Format { dsn: dsn.into() }
    }

    /// Creates a connection error; `context` must already be redacted
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query error with the failing statement attached
    pub fn query_failed<E>(statement: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            statement: statement.into(),
            source: Box::new(error),
        }
    }

    /// Creates a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Creates an output error
    pub fn io(context: impl Into<String>, error: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source: error,
        }
    }

    /// Returns true when the error means "fix your invocation" rather than
    /// "something failed while talking to the database".
    pub const fn is_invocation_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Format { .. } | Self::Usage { .. }
        )
    }
}
