//! Data structures shared by the schema reader and the report formatters.

use crate::error::TableDocError;
use std::str::FromStr;

/// Key classification reported by `SHOW COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnKey {
    /// Column is not indexed
    #[default]
    None,
    /// Part of the primary key (`PRI`)
    Primary,
    /// First column of a unique index (`UNI`)
    Unique,
    /// First column of a non-unique index (`MUL`)
    Multiple,
    /// Any other value, kept verbatim
    Other(String),
}

impl ColumnKey {
    /// Classifies the raw `Key` column text.
    pub fn from_server(raw: &str) -> Self {
        match raw {
            "" => Self::None,
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            other => Self::Other(other.to_string()),
        }
    }

    /// The text the server reported for this key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "",
            Self::Primary => "PRI",
            Self::Unique => "UNI",
            Self::Multiple => "MUL",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of one table, decoded from a `SHOW COLUMNS` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Declared type, e.g. `varchar(255)` or `int unsigned`
    pub column_type: String,
    /// Whether the column accepts NULL
    pub is_nullable: bool,
    /// Index membership
    pub key: ColumnKey,
    /// Default value; `None` when the server reports SQL NULL
    pub default_value: Option<String>,
    /// Extra attributes such as `auto_increment`
    pub extra: String,
}

impl ColumnDescriptor {
    /// Creates a descriptor for a nullable, unkeyed column without default.
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            is_nullable: true,
            key: ColumnKey::None,
            default_value: None,
            extra: String::new(),
        }
    }

    /// Builder method to set nullability.
    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Builder method to set the key classification.
    pub fn with_key(mut self, key: ColumnKey) -> Self {
        self.key = key;
        self
    }

    /// Builder method to set the default value.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Builder method to set extra attributes.
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }

    /// True for the conventional surrogate key: `id`, `PRI`, `auto_increment`.
    pub fn is_surrogate_id(&self) -> bool {
        self.name == "id" && self.key == ColumnKey::Primary && self.extra == "auto_increment"
    }
}

/// Which report layout to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// ER diagram entity blocks
    #[default]
    Diagram,
    /// Markdown tables
    Markdown,
}

impl OutputKind {
    /// The command-line spelling of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diagram => "diagram",
            Self::Markdown => "markdown",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = TableDocError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "diagram" => Ok(Self::Diagram),
            "markdown" => Ok(Self::Markdown),
            other => Err(TableDocError::usage(format!(
                "unknown output kind '{}': expected 'diagram' or 'markdown'",
                other
            ))),
        }
    }
}

/// Everything the pipeline needs to know besides the connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// Only tables whose name starts with this are described
    pub prefix: String,
    /// Report layout
    pub kind: OutputKind,
    /// Column names omitted from every table, in the order given
    pub excluded_columns: Vec<String>,
}

impl ReportConfig {
    /// Creates a config describing every table as an ER diagram.
    pub fn new(kind: OutputKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Builder method to set the table-name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Builder method to add an excluded column name.
    pub fn exclude(mut self, column: impl Into<String>) -> Self {
        self.excluded_columns.push(column.into());
        self
    }

    /// Whether `table` passes the prefix filter.
    pub fn includes_table(&self, table: &str) -> bool {
        table.starts_with(&self.prefix)
    }
}
