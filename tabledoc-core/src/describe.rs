//! The describe pipeline: list tables, filter by prefix, stream each table's
//! columns through a [`ReportWriter`].

use crate::Result;
use crate::dsn::DataSourceName;
use crate::models::ReportConfig;
use crate::mysql::MySqlSchemaSource;
use crate::report::{ColumnSink, ReportWriter};
use async_trait::async_trait;
use std::io::Write;
use tracing::{debug, info, warn};

/// Where table and column metadata comes from.
///
/// Implementations are used strictly sequentially: `read_columns` is never
/// called while another call on the same source is in flight.
#[async_trait]
pub trait SchemaSource: Send {
    /// Returns every table name in the order the server reports them.
    ///
    /// # Errors
    /// Returns `TableDocError::Query` if the listing statement fails.
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Decodes the columns of `table` in server order, handing each one to
    /// `sink` as soon as it is read.
    ///
    /// # Errors
    /// Returns `TableDocError::Query` if the statement or a row decode fails,
    /// or whatever error `sink` returns.
    async fn read_columns(&mut self, table: &str, sink: &mut dyn ColumnSink) -> Result<()>;
}

/// Writes one report block per table of `source` that passes the prefix
/// filter, then flushes and returns `out`.
///
/// The first failing table aborts the run: it writes nothing, and later
/// tables are not queried.
///
/// # Errors
/// Propagates any query, decode, or output error.
pub async fn describe_schema<S, W>(source: &mut S, config: &ReportConfig, out: W) -> Result<W>
where
    S: SchemaSource + ?Sized,
    W: Write + Send,
{
    let start_time = std::time::Instant::now();

    let all_tables = source.list_tables().await?;
    let total = all_tables.len();
    let tables: Vec<String> = all_tables
        .into_iter()
        .filter(|table| config.includes_table(table))
        .collect();

    info!(
        "Found {} tables, {} matching prefix '{}'",
        total,
        tables.len(),
        config.prefix
    );

    let mut writer = ReportWriter::new(out, config);
    for table in &tables {
        debug!("Describing table {}", table);
        writer.begin_table(table);
        source.read_columns(table, &mut writer).await?;
        writer.end_table()?;
    }

    info!(
        "Described {} tables in {:.2}s",
        writer.tables_written(),
        start_time.elapsed().as_secs_f64()
    );

    writer.finish()
}

/// Connects to the database named by `dsn`, writes the report to `out`, and
/// closes the connection whether or not the report succeeded.
///
/// # Errors
/// - `TableDocError::Connection` if the server cannot be reached
/// - any error from [`describe_schema`]
pub async fn describe_database<W>(dsn: &DataSourceName, config: &ReportConfig, out: W) -> Result<W>
where
    W: Write + Send,
{
    info!(
        "Describing tables of {} as {}",
        dsn.redacted(),
        config.kind
    );

    let mut source = MySqlSchemaSource::connect(dsn).await?;
    let outcome = describe_schema(&mut source, config, out).await;

    if let Err(e) = source.close().await {
        warn!("{}", e);
    }

    outcome
}
