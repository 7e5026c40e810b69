#![allow(dead_code)]

use std::time::Duration;

use stepweave_core::{StepConfig, Table, TestContext};
use stepweave_http::{HttpConfig, HttpSession};
use wiremock::MockServer;

/// Session whose relative URLs resolve against the mock server.
pub fn session_for(server: &MockServer) -> HttpSession {
    let config = HttpConfig::new()
        .with_base_url(&server.uri())
        .unwrap()
        .with_retry_base_delay(Duration::from_millis(10));
    HttpSession::new(config).unwrap()
}

pub fn context() -> TestContext {
    TestContext::new(StepConfig::new())
}

pub fn table(rows: &[&[&str]]) -> Table {
    Table::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
    .unwrap()
}
