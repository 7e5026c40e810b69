//! World struct for the HTTP step scenarios
//!
//! Holds the mock server, the HTTP session and the test context of one scenario.

use std::fmt;

use cucumber::World;
use stepweave_core::{StepConfig, Table, TestContext};
use stepweave_http::{HttpConfig, HttpSession};
use wiremock::MockServer;

#[derive(World)]
#[world(init = Self::new)]
pub struct HttpWorld {
    /// Mock server started by the background step
    pub server: Option<MockServer>,
    pub session: HttpSession,
    pub context: TestContext,
}

impl fmt::Debug for HttpWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpWorld")
            .field("server", &self.server.as_ref().map(MockServer::uri))
            .field("assertions", &self.context.assertions().records())
            .finish()
    }
}

impl Default for HttpWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpWorld {
    pub fn new() -> Self {
        Self {
            server: None,
            session: HttpSession::new(HttpConfig::new()).expect("HTTP session"),
            context: TestContext::new(StepConfig::new()),
        }
    }

    /// Start a mock server and point relative URLs at it.
    pub async fn start_server(&mut self) {
        let server = MockServer::start().await;
        let config = HttpConfig::new()
            .with_base_url(&server.uri())
            .expect("mock server URI is a valid base URL");
        self.session = HttpSession::new(config).expect("HTTP session");
        self.server = Some(server);
    }

    /// End the scenario: reset the session, then report soft-assertion
    /// failures that are still pending.
    pub fn finish_scenario(&mut self) -> Result<(), String> {
        self.session.finish_scenario();
        self.context.finish_scenario().map_err(|e| e.to_string())
    }

    pub fn server(&self) -> &MockServer {
        self.server
            .as_ref()
            .expect("no mock server; add 'Given a mock HTTP server' to the scenario")
    }
}

/// Convert a Gherkin data table into a step table.
pub fn step_table(step: &cucumber::gherkin::Step) -> Table {
    let rows = step
        .table
        .as_ref()
        .map(|table| table.rows.clone())
        .expect("step requires a data table");
    Table::new(rows).expect("well-formed data table")
}
