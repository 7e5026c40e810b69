//! Step configuration loaded from the environment.

use std::collections::BTreeMap;
use std::time::Duration;

/// Default timeout for wait steps in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Default polling interval for wait steps in milliseconds.
pub const DEFAULT_WAIT_POLLING_MILLIS: u64 = 250;

/// Prefix of environment variables that seed global variables.
pub const GLOBAL_VARIABLE_PREFIX: &str = "STEPWEAVE_VAR_";

#[derive(Debug, Clone)]
pub struct StepConfig {
    pub wait_timeout: Duration,
    pub wait_polling: Duration,
    /// Abort the scenario at the end of the first step that records a failure.
    pub fail_fast: bool,
    pub global_variables: BTreeMap<String, String>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StepConfig {
    pub fn new() -> Self {
        Self {
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            wait_polling: Duration::from_millis(DEFAULT_WAIT_POLLING_MILLIS),
            fail_fast: false,
            global_variables: BTreeMap::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build a configuration from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new();

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "STEPWEAVE_WAIT_TIMEOUT_SECS" => {
                    if let Ok(secs) = value.parse() {
                        config.wait_timeout = Duration::from_secs(secs);
                    }
                }
                "STEPWEAVE_WAIT_POLLING_MILLIS" => {
                    if let Ok(millis) = value.parse() {
                        config.wait_polling = Duration::from_millis(millis);
                    }
                }
                "STEPWEAVE_SOFT_ASSERT_FAIL_FAST" => {
                    config.fail_fast = value == "true" || value == "1";
                }
                _ => {
                    if let Some(name) = key.strip_prefix(GLOBAL_VARIABLE_PREFIX) {
                        if !name.is_empty() {
                            config
                                .global_variables
                                .insert(name.to_lowercase(), value.to_string());
                        }
                    }
                }
            }
        }

        config
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_wait_polling(mut self, polling: Duration) -> Self {
        self.wait_polling = polling;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_global_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_variables.insert(name.into(), value.into());
        self
    }
}
