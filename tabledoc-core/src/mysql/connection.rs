//! MySQL connection setup and teardown.
//!
//! One connection serves the whole run. It is opened by
//! [`MySqlSchemaSource::connect`] and must be released with
//! [`MySqlSchemaSource::close`].

use super::MySqlSchemaSource;
use crate::Result;
use crate::dsn::DataSourceName;
use crate::error::TableDocError;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, Executor, MySqlConnection};

/// Builds driver connect options from a validated data source name.
pub fn connect_options(dsn: &DataSourceName) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(dsn.host())
        .port(dsn.port())
        .username(dsn.user())
        .password(dsn.password())
        .database(dsn.database())
}

impl MySqlSchemaSource {
    /// Opens the connection and switches the session to read-only.
    ///
    /// # Errors
    /// Returns `TableDocError::Connection` if the server cannot be reached,
    /// rejects the credentials, or refuses the session setup.
    pub async fn connect(dsn: &DataSourceName) -> Result<Self> {
        let target = dsn.redacted();
        tracing::debug!("Connecting to {}", target);

        let mut conn = MySqlConnection::connect_with(&connect_options(dsn))
            .await
            .map_err(|e| TableDocError::connection_failed(format!("cannot connect to {}", target), e))?;

        conn.execute("SET SESSION TRANSACTION READ ONLY")
            .await
            .map_err(|e| {
                TableDocError::connection_failed(
                    format!("cannot start read-only session on {}", target),
                    e,
                )
            })?;

        tracing::info!("Connected to {}", target);
        Ok(Self { conn, target })
    }

    /// Closes the connection gracefully.
    ///
    /// # Errors
    /// Returns `TableDocError::Connection` if the close handshake fails; the
    /// socket is released either way.
    pub async fn close(self) -> Result<()> {
        let target = self.target;
        self.conn.close().await.map_err(|e| {
            TableDocError::connection_failed(format!("failed to close connection to {}", target), e)
        })?;
        tracing::debug!("Closed connection to {}", target);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_dsn() {
        let dsn: DataSourceName = "reporter:s3cret@tcp(db.internal:3307)/inventory"
            .parse()
            .unwrap();
        let options = connect_options(&dsn);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_username(), "reporter");
        assert_eq!(options.get_database(), Some("inventory"));
    }
}
