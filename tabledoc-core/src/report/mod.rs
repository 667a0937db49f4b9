//! Report rendering.
//!
//! [`ReportWriter`] is the single traversal: it owns the output sink, applies
//! the exclusion set, and hands every surviving column to a [`TableFormat`]
//! strategy. The two strategies live in their own modules.
//!
//! A table's block is only started once its first column arrives or the
//! table is ended, so a table whose column query fails leaves no output.
//!
//! # Module Structure
//! - `markdown`: `### table` heading plus a Markdown table per table
//! - `diagram`: `table { type name key }` entity blocks for text ER diagrams

pub mod diagram;
pub mod markdown;

use crate::Result;
use crate::error::TableDocError;
use crate::models::{ColumnDescriptor, OutputKind, ReportConfig};
use std::collections::HashSet;
use std::io::{self, Write};

pub use diagram::DiagramFormat;
pub use markdown::MarkdownFormat;

/// Rendering strategy for one table block.
pub trait TableFormat: Send + Sync {
    /// Writes whatever precedes the first column of `table`.
    fn write_table_start(&self, out: &mut dyn Write, table: &str) -> io::Result<()>;

    /// Writes one column row.
    fn write_column(&self, out: &mut dyn Write, column: &ColumnDescriptor) -> io::Result<()>;

    /// Writes whatever follows the last column of `table`.
    fn write_table_end(&self, out: &mut dyn Write, table: &str) -> io::Result<()>;
}

/// Returns the strategy for an output kind.
pub fn format_for(kind: OutputKind) -> Box<dyn TableFormat> {
    match kind {
        OutputKind::Diagram => Box::new(DiagramFormat),
        OutputKind::Markdown => Box::new(MarkdownFormat),
    }
}

/// Receives decoded columns one at a time from a schema source.
pub trait ColumnSink: Send {
    /// Handles the next column of the table currently being described.
    ///
    /// # Errors
    /// Returns an error if the column cannot be written.
    fn column(&mut self, column: &ColumnDescriptor) -> Result<()>;
}

/// Streams table blocks to an output sink.
///
/// # Example
/// ```rust
/// use tabledoc_core::models::{ColumnDescriptor, OutputKind, ReportConfig};
/// use tabledoc_core::report::{ColumnSink, ReportWriter};
///
/// let config = ReportConfig::new(OutputKind::Diagram).exclude("created_at");
/// let mut writer = ReportWriter::new(Vec::new(), &config);
/// writer.begin_table("users");
/// writer.column(&ColumnDescriptor::new("email", "varchar(255)")).unwrap();
/// writer.column(&ColumnDescriptor::new("created_at", "timestamp")).unwrap();
/// writer.end_table().unwrap();
///
/// let out = String::from_utf8(writer.finish().unwrap()).unwrap();
/// assert_eq!(out, "\n  users {\n    varchar(255) email \n  }\n\n");
/// ```
pub struct ReportWriter<W: Write> {
    out: W,
    format: Box<dyn TableFormat>,
    excluded: HashSet<String>,
    current_table: Option<String>,
    started: bool,
    tables_written: usize,
}

impl<W: Write> std::fmt::Debug for ReportWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWriter")
            .field("excluded", &self.excluded)
            .field("current_table", &self.current_table)
            .field("tables_written", &self.tables_written)
            .finish_non_exhaustive()
    }
}

impl<W: Write> ReportWriter<W> {
    /// Creates a writer for the layout and exclusions in `config`.
    pub fn new(out: W, config: &ReportConfig) -> Self {
        Self {
            out,
            format: format_for(config.kind),
            excluded: config.excluded_columns.iter().cloned().collect(),
            current_table: None,
            started: false,
            tables_written: 0,
        }
    }

    /// Makes `table` the current table.
    ///
    /// Nothing is written yet; a table that is never ended and never
    /// receives a column produces no output.
    pub fn begin_table(&mut self, table: &str) {
        self.current_table = Some(table.to_string());
        self.started = false;
    }

    /// Closes the current table block, starting it first if no column
    /// has been written.
    ///
    /// # Errors
    /// Returns `TableDocError::Io` if the output cannot be written.
    pub fn end_table(&mut self) -> Result<()> {
        self.start_pending_table()?;
        let table = self.current_table.take().unwrap_or_default();
        self.started = false;
        self.format
            .write_table_end(&mut self.out, &table)
            .map_err(|e| write_failed(&table, e))?;
        self.tables_written = self.tables_written.saturating_add(1);
        Ok(())
    }

    fn start_pending_table(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        let table = self.current_table.as_deref().unwrap_or_default();
        self.format
            .write_table_start(&mut self.out, table)
            .map_err(|e| write_failed(table, e))?;
        self.started = true;
        Ok(())
    }

    /// Number of table blocks completed so far.
    pub const fn tables_written(&self) -> usize {
        self.tables_written
    }

    /// Whether `column` is in the exclusion set.
    pub fn is_excluded(&self, column: &str) -> bool {
        self.excluded.contains(column)
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    /// Returns `TableDocError::Io` if flushing fails.
    pub fn finish(mut self) -> Result<W> {
        self.out
            .flush()
            .map_err(|e| TableDocError::io("Failed to flush report output", e))?;
        Ok(self.out)
    }
}

impl<W: Write + Send> ColumnSink for ReportWriter<W> {
    fn column(&mut self, column: &ColumnDescriptor) -> Result<()> {
        if self.is_excluded(&column.name) {
            tracing::trace!("Skipping excluded column {}", column.name);
            return Ok(());
        }
        self.start_pending_table()?;
        self.format
            .write_column(&mut self.out, column)
            .map_err(|e| write_failed(self.current_table.as_deref().unwrap_or_default(), e))
    }
}

fn write_failed(table: &str, error: io::Error) -> TableDocError {
    TableDocError::io(format!("Failed to write report block for table '{}'", table), error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::ColumnKey;

    fn render(config: &ReportConfig, tables: &[(&str, Vec<ColumnDescriptor>)]) -> String {
        let mut writer = ReportWriter::new(Vec::new(), config);
        for (table, columns) in tables {
            writer.begin_table(table);
            for column in columns {
                writer.column(column).unwrap();
            }
            writer.end_table().unwrap();
        }
        assert_eq!(writer.tables_written(), tables.len());
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    fn users_columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", "int")
                .with_nullable(false)
                .with_key(ColumnKey::Primary)
                .with_extra("auto_increment"),
            ColumnDescriptor::new("email", "varchar(255)").with_key(ColumnKey::Unique),
            ColumnDescriptor::new("created_at", "timestamp")
                .with_default("CURRENT_TIMESTAMP")
                .with_extra("DEFAULT_GENERATED"),
        ]
    }

    #[test]
    fn test_exclusion_applies_to_every_table_and_kind() {
        let tables = [
            ("users", users_columns()),
            (
                "orders",
                vec![
                    ColumnDescriptor::new("total", "decimal(10,2)"),
                    ColumnDescriptor::new("created_at", "timestamp"),
                ],
            ),
        ];
        for kind in [OutputKind::Diagram, OutputKind::Markdown] {
            let config = ReportConfig::new(kind).exclude("created_at");
            let out = render(&config, &tables);
            assert!(!out.contains("created_at"), "{kind} output: {out}");
            assert!(out.contains("email"));
            assert!(out.contains("total"));
        }
    }

    #[test]
    fn test_table_and_column_order_preserved() {
        let tables = [("b_table", users_columns()), ("a_table", users_columns())];
        let out = render(&ReportConfig::new(OutputKind::Diagram), &tables);

        let b = out.find("b_table").unwrap();
        let a = out.find("a_table").unwrap();
        assert!(b < a);

        let id = out.find(" id ").unwrap();
        let email = out.find(" email ").unwrap();
        let created = out.find(" created_at ").unwrap();
        assert!(id < email && email < created);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let tables = [("users", users_columns())];
        let config = ReportConfig::new(OutputKind::Markdown).exclude("email");
        assert_eq!(render(&config, &tables), render(&config, &tables));
    }

    #[test]
    fn test_table_without_columns_still_gets_a_block() {
        let out = render(&ReportConfig::new(OutputKind::Diagram), &[("empty", Vec::new())]);
        assert_eq!(out, "\n  empty {\n  }\n\n");
    }

    #[test]
    fn test_abandoned_table_writes_nothing() {
        for kind in [OutputKind::Diagram, OutputKind::Markdown] {
            let mut writer = ReportWriter::new(Vec::new(), &ReportConfig::new(kind));
            writer.begin_table("users");
            writer.column(&users_columns()[1]).unwrap();
            writer.end_table().unwrap();
            let complete = String::from_utf8(writer.finish().unwrap()).unwrap();

            let mut writer = ReportWriter::new(Vec::new(), &ReportConfig::new(kind));
            writer.begin_table("vanished");
            writer.begin_table("users");
            writer.column(&users_columns()[1]).unwrap();
            writer.end_table().unwrap();
            let out = String::from_utf8(writer.finish().unwrap()).unwrap();

            assert!(!out.contains("vanished"), "{kind} output: {out}");
            assert_eq!(out, complete);
        }
    }

    #[test]
    fn test_excluded_columns_do_not_start_a_block() {
        let config = ReportConfig::new(OutputKind::Markdown).exclude("created_at");
        let mut writer = ReportWriter::new(Vec::new(), &config);
        writer.begin_table("users");
        writer.column(&users_columns()[2]).unwrap();
        assert!(writer.finish().unwrap().is_empty());
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_names_table() {
        let mut writer = ReportWriter::new(FailingSink, &ReportConfig::default());
        writer.begin_table("users");
        let error = writer.end_table().unwrap_err();
        assert!(matches!(error, TableDocError::Io { .. }));
        assert!(error.to_string().contains("users"));
    }
}
