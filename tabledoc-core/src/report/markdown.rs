//! Markdown table layout.

use super::TableFormat;
use crate::models::ColumnDescriptor;
use std::io::{self, Write};

const HEADER: &str = "| Field | Type | Null | Key | Def | Extra |\n";
const ALIGNMENT: &str = "|:----- |:---- |:----:|:---:|:--- |:----- |\n";

/// Renders each table as a `###` heading followed by a Markdown table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormat;

impl TableFormat for MarkdownFormat {
    fn write_table_start(&self, out: &mut dyn Write, table: &str) -> io::Result<()> {
        write!(out, "### {}\n{}{}", table, HEADER, ALIGNMENT)
    }

    fn write_column(&self, out: &mut dyn Write, column: &ColumnDescriptor) -> io::Result<()> {
        let null = if column.is_nullable { "Y" } else { "N" };
        let default_value = column.default_value.as_deref().unwrap_or_default();
        // A plain auto-increment `id` primary key needs no annotation.
        let extra = if column.is_surrogate_id() {
            ""
        } else {
            column.extra.as_str()
        };
        writeln!(
            out,
            "|{:>30}|{:>13}|{}|{:>3}|{:>2}|{:>4}|",
            column.name,
            column.column_type,
            null,
            column.key.as_str(),
            default_value,
            extra
        )
    }

    fn write_table_end(&self, out: &mut dyn Write, _table: &str) -> io::Result<()> {
        writeln!(out)
    }
}
