//! Per-scenario test context and lifecycle boundaries.

use crate::config::StepConfig;
use crate::error::Result;
use crate::soft_assert::SoftAssert;
use crate::variables::{VariableContext, VariableScope};
use crate::wait::WaitSpec;

/// State shared by every step of a running scenario.
#[derive(Debug)]
pub struct TestContext {
    config: StepConfig,
    soft_assert: SoftAssert,
    variables: VariableContext,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(StepConfig::new())
    }
}

impl TestContext {
    pub fn new(config: StepConfig) -> Self {
        let variables = VariableContext::with_globals(&config);
        Self {
            config,
            soft_assert: SoftAssert::new(),
            variables,
        }
    }

    pub fn from_env() -> Self {
        Self::new(StepConfig::from_env())
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn soft_assert(&mut self) -> &mut SoftAssert {
        &mut self.soft_assert
    }

    pub fn assertions(&self) -> &SoftAssert {
        &self.soft_assert
    }

    pub fn variables(&self) -> &VariableContext {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableContext {
        &mut self.variables
    }

    /// Substitute `${var}` placeholders in a step argument.
    pub fn resolve(&self, text: &str) -> String {
        self.variables.resolve(text)
    }

    pub fn wait_spec(&self) -> WaitSpec {
        WaitSpec::from_config(&self.config)
    }

    /// End of a step: drop step variables, stop early in fail-fast mode.
    pub fn finish_step(&mut self) -> Result<()> {
        self.variables.clear_scope(VariableScope::Step);
        if self.config.fail_fast {
            self.soft_assert.verify()?;
        }
        Ok(())
    }

    /// End of a scenario: report collected failures and reset scenario state.
    ///
    /// State is reset even when verification fails.
    pub fn finish_scenario(&mut self) -> Result<()> {
        let outcome = self.soft_assert.verify();
        self.soft_assert.clear();
        self.variables.clear_scope(VariableScope::Scenario);
        outcome
    }

    pub fn finish_story(&mut self) {
        self.variables.clear_scope(VariableScope::Story);
    }

    pub fn finish_batch(&mut self) {
        self.variables.clear_scope(VariableScope::NextBatches);
    }
}
