//! MySQL schema source.
//!
//! # Module Structure
//! - `connection`: single-connection setup and teardown
//! - `schema_reader`: `SHOW TABLES` / `SHOW COLUMNS` and row decoding
//!
//! # Security Guarantees
//! - Only `SHOW` statements are issued, in a read-only session
//! - Connection strings are redacted in logs and error messages

pub mod connection;
pub mod schema_reader;

use sqlx::MySqlConnection;

pub use connection::connect_options;
pub use schema_reader::{SHOW_TABLES, decode_nullable_flag, quote_identifier, show_columns_statement};

/// A [`SchemaSource`](crate::describe::SchemaSource) backed by one MySQL connection.
pub struct MySqlSchemaSource {
    conn: MySqlConnection,
    target: String,
}

impl std::fmt::Debug for MySqlSchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSchemaSource")
            // Redacted at construction; the connection itself is omitted
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
