//! Table enumeration and column introspection.
//!
//! Rows are decoded once, here, into [`ColumnDescriptor`]. Text columns are
//! read as raw bytes because `SHOW COLUMNS` reports several of them as BLOB
//! types depending on server version.

use super::MySqlSchemaSource;
use crate::Result;
use crate::describe::SchemaSource;
use crate::error::TableDocError;
use crate::models::{ColumnDescriptor, ColumnKey};
use crate::report::ColumnSink;
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::mysql::MySqlRow;
use sqlx::{ColumnIndex, Row};

/// Statement used to enumerate tables.
pub const SHOW_TABLES: &str = "SHOW TABLES";

/// Backtick-quotes an identifier, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Statement used to describe the columns of `table`.
pub fn show_columns_statement(table: &str) -> String {
    format!("SHOW COLUMNS FROM {}", quote_identifier(table))
}

/// Interprets the `Null` column: anything but a leading `N` means nullable.
pub fn decode_nullable_flag(raw: &[u8]) -> bool {
    raw.first() != Some(&b'N')
}

/// Extension trait for reading text cells with the statement as error context.
trait RowExt {
    fn text<I>(&self, index: I, statement: &str) -> Result<String>
    where
        I: ColumnIndex<MySqlRow>;

    fn optional_text<I>(&self, index: I, statement: &str) -> Result<Option<String>>
    where
        I: ColumnIndex<MySqlRow>;

    fn raw_bytes<I>(&self, index: I, statement: &str) -> Result<Vec<u8>>
    where
        I: ColumnIndex<MySqlRow>;
}

impl RowExt for MySqlRow {
    fn text<I>(&self, index: I, statement: &str) -> Result<String>
    where
        I: ColumnIndex<MySqlRow>,
    {
        let raw = self.raw_bytes(index, statement)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    fn optional_text<I>(&self, index: I, statement: &str) -> Result<Option<String>>
    where
        I: ColumnIndex<MySqlRow>,
    {
        let raw: Option<Vec<u8>> = self
            .try_get(index)
            .map_err(|e| TableDocError::query_failed(statement, e))?;
        Ok(raw.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn raw_bytes<I>(&self, index: I, statement: &str) -> Result<Vec<u8>>
    where
        I: ColumnIndex<MySqlRow>,
    {
        self.try_get(index)
            .map_err(|e| TableDocError::query_failed(statement, e))
    }
}

/// Decodes one `SHOW COLUMNS` row.
fn decode_column(row: &MySqlRow, statement: &str) -> Result<ColumnDescriptor> {
    Ok(ColumnDescriptor {
        name: row.text("Field", statement)?,
        column_type: row.text("Type", statement)?,
        is_nullable: decode_nullable_flag(&row.raw_bytes("Null", statement)?),
        key: ColumnKey::from_server(&row.text("Key", statement)?),
        default_value: row.optional_text("Default", statement)?,
        extra: row.text("Extra", statement)?,
    })
}

#[async_trait]
impl SchemaSource for MySqlSchemaSource {
    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows = sqlx::query(SHOW_TABLES)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| {
                tracing::error!("query failed: {}", SHOW_TABLES);
                TableDocError::query_failed(SHOW_TABLES, e)
            })?;

        rows.iter().map(|row| row.text(0_usize, SHOW_TABLES)).collect()
    }

    async fn read_columns(&mut self, table: &str, sink: &mut dyn ColumnSink) -> Result<()> {
        let statement = show_columns_statement(table);
        let mut rows = sqlx::query(&statement).fetch(&mut self.conn);

        let mut count = 0usize;
        while let Some(row) = rows.try_next().await.map_err(|e| {
            tracing::error!("query failed: {}", statement);
            TableDocError::query_failed(statement.as_str(), e)
        })? {
            sink.column(&decode_column(&row, &statement)?)?;
            count = count.saturating_add(1);
        }

        tracing::trace!("Read {} columns from {}", count, table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("users"), "`users`");
        assert_eq!(quote_identifier("order items"), "`order items`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_show_columns_statement() {
        assert_eq!(show_columns_statement("usr_a"), "SHOW COLUMNS FROM `usr_a`");
        assert_eq!(
            show_columns_statement("x`; DROP TABLE y; --"),
            "SHOW COLUMNS FROM `x``; DROP TABLE y; --`"
        );
    }

    #[test]
    fn test_decode_nullable_flag() {
        assert!(!decode_nullable_flag(b"NO"));
        assert!(decode_nullable_flag(b"YES"));
        assert!(decode_nullable_flag(b""));
    }
}
