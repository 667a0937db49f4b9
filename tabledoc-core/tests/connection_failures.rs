//! Connection error handling without requiring a real database.

#![allow(clippy::unwrap_used)]

use tabledoc_core::{OutputKind, ReportConfig, TableDocError, describe_database, resolve_dsn};

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let dsn = resolve_dsn("invalid:invalid@tcp(127.0.0.1:9999)/invalid").unwrap();
    let config = ReportConfig::new(OutputKind::Markdown);

    let result = describe_database(&dsn, &config, Vec::new()).await;

    let error = result.unwrap_err();
    assert!(
        matches!(error, TableDocError::Connection { .. }),
        "expected connection error, got {error:?}"
    );
    assert!(!error.is_invocation_error());
}

#[tokio::test]
async fn test_connection_error_does_not_leak_password() {
    let dsn = resolve_dsn("invalid:topsecret@tcp(127.0.0.1:9999)/invalid").unwrap();
    let config = ReportConfig::default();

    let error = describe_database(&dsn, &config, Vec::new())
        .await
        .unwrap_err();

    let message = error.to_string();
    assert!(!message.contains("topsecret"));
    assert!(message.contains("invalid:****@tcp(127.0.0.1:9999)/invalid"));
}
