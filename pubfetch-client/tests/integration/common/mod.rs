//! Shared helpers for the mocked E-utilities tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pubfetch_client::{ClientConfig, EUtilsClient, RetryConfig};
use serde_json::json;
use wiremock::MockServer;

/// Resolve a fixture under `test_data/`, from either the workspace root or the crate root
pub fn fixture_path(filename: &str) -> PathBuf {
    let workspace = Path::new("pubfetch-client/tests/integration/test_data").join(filename);
    if workspace.exists() {
        return workspace;
    }
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/test_data")
        .join(filename)
}

pub fn read_fixture(filename: &str) -> String {
    let path = fixture_path(filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {path:?}"))
}

/// Fast retries so failure tests do not sleep for seconds
pub fn quick_retries(max_retries: usize) -> RetryConfig {
    RetryConfig::fixed(max_retries, Duration::from_millis(10))
}

/// Create a client pointing at a mock server
pub fn create_mock_client(mock_server: &MockServer) -> EUtilsClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_citation_base_url(mock_server.uri())
        .with_rate_limit(100.0) // High rate limit for tests
        .with_retry_config(quick_retries(2));

    EUtilsClient::with_config(config)
}

/// An ESearch JSON body reporting `count` hits and listing `ids`
pub fn esearch_body(count: usize, retstart: usize, ids: &[String]) -> String {
    json!({
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": {
            "count": count.to_string(),
            "retmax": ids.len().to_string(),
            "retstart": retstart.to_string(),
            "idlist": ids,
            "translationset": [],
            "querytranslation": "test[All Fields]"
        }
    })
    .to_string()
}

/// Sequential numeric ids `start..start + n` as strings
pub fn id_range(start: usize, n: usize) -> Vec<String> {
    (start..start + n).map(|id| id.to_string()).collect()
}
