//! Core library for tabledoc.
//!
//! tabledoc connects to a MySQL database, lists the tables whose names start
//! with a prefix, and prints each table's columns either as a Markdown table
//! or as an ER diagram entity block.
//!
//! # Security Guarantees
//! - Only `SHOW TABLES` and `SHOW COLUMNS` are issued, in a read-only session
//! - Passwords are zeroized on drop and never logged
//!
//! # Architecture
//! - `dsn`: resolves the `--dsn` argument into a validated connection descriptor
//! - `mysql`: the database-backed `SchemaSource`
//! - `describe`: the list-filter-stream pipeline
//! - `report`: one traversal, two formatting strategies

pub mod describe;
pub mod dsn;
pub mod error;
pub mod logging;
pub mod models;
pub mod mysql;
pub mod report;

// Re-export commonly used types
pub use describe::{SchemaSource, describe_database, describe_schema};
pub use dsn::{DataSourceName, resolve_dsn};
pub use error::{Result, TableDocError};
pub use logging::init_logging;
pub use models::{ColumnDescriptor, ColumnKey, OutputKind, ReportConfig};
pub use report::{ColumnSink, ReportWriter, TableFormat};
