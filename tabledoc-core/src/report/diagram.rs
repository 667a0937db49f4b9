//! Entity blocks for text-based ER diagram renderers (mermaid `erDiagram` syntax).

use super::TableFormat;
use crate::models::ColumnDescriptor;
use std::io::{self, Write};

/// Renders each table as `  table {` / `    type name key` / `  }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramFormat;

impl TableFormat for DiagramFormat {
    fn write_table_start(&self, out: &mut dyn Write, table: &str) -> io::Result<()> {
        write!(out, "\n  {} {{\n", table)
    }

    fn write_column(&self, out: &mut dyn Write, column: &ColumnDescriptor) -> io::Result<()> {
        writeln!(
            out,
            "    {} {} {}",
            column.column_type,
            column.name,
            column.key.as_str()
        )
    }

    fn write_table_end(&self, out: &mut dyn Write, _table: &str) -> io::Result<()> {
        write!(out, "  }}\n\n")
    }
}
