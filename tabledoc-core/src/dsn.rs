//! Connection descriptor resolution.
//!
//! The `--dsn` argument is either a literal data source name of the form
//! `user:pass@tcp(host:port)/database` or the path of a `*.json` credentials
//! file that is turned into one. Either way the result is validated against
//! the same pattern before anything touches the network.
//!
//! # Security
//! - Passwords live in `Zeroizing` containers and are cleared on drop
//! - `Debug` and `Display` never print the password

use crate::Result;
use crate::error::TableDocError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Suffix that marks the `--dsn` argument as a credentials file path.
pub const CREDENTIALS_FILE_SUFFIX: &str = ".json";

#[allow(clippy::expect_used)]
fn dsn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?P<user>[a-z0-9]+):(?P<password>.*)@tcp\((?P<host>[a-z0-9_.-]+):(?P<port>[0-9]+)\)/(?P<database>[a-z0-9_.-]+)$",
        )
        .expect("Invalid DSN pattern")
    })
}

/// A validated `user:pass@tcp(host:port)/database` connection descriptor.
///
/// # Example
///
/// ```rust
/// use tabledoc_core::dsn::DataSourceName;
///
/// let dsn: DataSourceName = "app:secret@tcp(db.local:3306)/shop".parse().unwrap();
/// assert_eq!(dsn.as_str(), "app:secret@tcp(db.local:3306)/shop");
/// assert_eq!(dsn.redacted(), "app:****@tcp(db.local:3306)/shop");
/// ```
#[derive(Clone)]
pub struct DataSourceName {
    raw: Zeroizing<String>,
    user: String,
    password: Zeroizing<String>,
    host: String,
    port: u16,
    database: String,
}

impl DataSourceName {
    /// The validated string, exactly as it was supplied or built.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Database user name
    pub fn user(&self) -> &str {
        &self.user
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Server host name or address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server TCP port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Schema whose tables are described
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Rendering with the password masked, safe for logs and error messages.
    pub fn redacted(&self) -> String {
        format!(
            "{}:****@tcp({}:{})/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl FromStr for DataSourceName {
    type Err = TableDocError;

    fn from_str(s: &str) -> Result<Self> {
        let captures = dsn_pattern()
            .captures(s)
            .ok_or_else(|| TableDocError::format(s))?;

        // The pattern only admits digits; anything past u16 is still malformed.
        let port = captures["port"]
            .parse::<u16>()
            .map_err(|_| TableDocError::format(s))?;

        Ok(Self {
            raw: Zeroizing::new(s.to_string()),
            user: captures["user"].to_string(),
            password: Zeroizing::new(captures["password"].to_string()),
            host: captures["host"].to_string(),
            port,
            database: captures["database"].to_string(),
        })
    }
}

impl std::fmt::Debug for DataSourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceName")
            .field("user", &self.user)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            // Note: password and raw string are intentionally omitted
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for DataSourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// JSON credentials file: `{"database","user","passwd","host","port"}`.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialsFile {
    /// Schema name
    pub database: String,
    /// Database user
    pub user: String,
    /// Password
    pub passwd: String,
    /// Server host
    pub host: String,
    /// Server port; range-checked when the resulting DSN is validated
    pub port: i64,
}

impl CredentialsFile {
    /// Reads and parses a credentials file.
    ///
    /// # Errors
    /// Returns `TableDocError::Config` naming the file if it cannot be read,
    /// is not a JSON object, or lacks one of the expected fields.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = Zeroizing::new(
            std::fs::read_to_string(path).map_err(|e| TableDocError::config(path, e))?,
        );
        // Struct deserialization would also accept a positional array
        let fields: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&contents).map_err(|e| TableDocError::config(path, e))?;
        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| TableDocError::config(path, e))
    }

    /// Builds the unvalidated `user:passwd@tcp(host:port)/database` string.
    pub fn to_dsn_string(&self) -> Zeroizing<String> {
        Zeroizing::new(format!(
            "{}:{}@tcp({}:{})/{}",
            self.user, self.passwd, self.host, self.port, self.database
        ))
    }
}

impl std::fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsFile")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

/// Resolves the `--dsn` argument into a validated data source name.
///
/// Arguments ending in `.json` are read as a [`CredentialsFile`]; everything
/// else is taken literally. Both paths end in the same shape check.
///
/// # Errors
/// - `TableDocError::Config` if the credentials file is unreadable or malformed
/// - `TableDocError::Format` if the resulting string has the wrong shape
pub fn resolve_dsn(arg: &str) -> Result<DataSourceName> {
    if arg.ends_with(CREDENTIALS_FILE_SUFFIX) {
        tracing::debug!("Loading credentials from {}", arg);
        let credentials = CredentialsFile::load(Path::new(arg))?;
        return credentials.to_dsn_string().parse();
    }
    arg.parse()
}
