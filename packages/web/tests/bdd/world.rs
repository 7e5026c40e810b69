//! World struct for the web step scenarios
//!
//! Holds the in-memory browser, the web session and the test context of one
//! scenario.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cucumber::World;
use stepweave_core::{StepConfig, Table, TestContext};
use stepweave_web::WebSession;

use crate::common::{session_with, FakeBrowser};

#[derive(World)]
#[world(init = Self::new)]
pub struct WebWorld {
    pub browser: Arc<FakeBrowser>,
    pub session: WebSession,
    pub context: TestContext,
}

impl fmt::Debug for WebWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebWorld")
            .field("contexts", &self.session.contexts)
            .field("assertions", &self.context.assertions().records())
            .finish()
    }
}

impl Default for WebWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WebWorld {
    pub fn new() -> Self {
        let browser = Arc::new(FakeBrowser::new());
        let session = session_with(&browser);
        // Short waits keep timed-out scenarios fast
        let config = StepConfig::new()
            .with_wait_timeout(Duration::from_millis(50))
            .with_wait_polling(Duration::from_millis(10));
        Self {
            browser,
            session,
            context: TestContext::new(config),
        }
    }

    /// End the scenario: leave frames and element contexts, then report
    /// soft-assertion failures that are still pending.
    pub async fn finish_scenario(&mut self) -> Result<(), String> {
        let session = self.session.finish_scenario().await.map_err(|e| e.to_string());
        let assertions = self.context.finish_scenario().map_err(|e| e.to_string());
        assertions.and(session)
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
