//! Soft assertions
//!
//! Assertion steps record their outcome here instead of panicking, so a
//! scenario keeps running after a failed check and reports every failure at
//! the end.

use std::fmt::{self, Debug, Display};

use crate::comparison::{ComparisonRule, StringComparisonRule};
use crate::error::{CoreError, Result};

/// Outcome of a single assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionRecord {
    pub description: String,
    pub passed: bool,
    pub details: String,
}

impl Display for AssertionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASSED" } else { "FAILED" };
        if self.details.is_empty() {
            write!(f, "[{status}] {}", self.description)
        } else {
            write!(f, "[{status}] {}: {}", self.description, self.details)
        }
    }
}

/// Collector of assertion outcomes for the running scenario.
#[derive(Debug, Default)]
pub struct SoftAssert {
    records: Vec<AssertionRecord>,
}

impl SoftAssert {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, description: &str, passed: bool, details: String) -> bool {
        if passed {
            tracing::debug!(description, details = %details, "assertion passed");
        } else {
            tracing::error!(description, details = %details, "assertion failed");
        }
        self.records.push(AssertionRecord {
            description: description.to_string(),
            passed,
            details,
        });
        passed
    }

    pub fn assert_true(&mut self, description: &str, condition: bool) -> bool {
        let details = if condition {
            String::new()
        } else {
            "expected condition to be true".to_string()
        };
        self.record(description, condition, details)
    }

    pub fn assert_false(&mut self, description: &str, condition: bool) -> bool {
        let details = if condition {
            "expected condition to be false".to_string()
        } else {
            String::new()
        };
        self.record(description, !condition, details)
    }

    pub fn assert_equals<T>(&mut self, description: &str, expected: &T, actual: &T) -> bool
    where
        T: PartialEq + Debug + ?Sized,
    {
        let passed = expected == actual;
        let details = format!("expected {expected:?}, actual {actual:?}");
        self.record(description, passed, details)
    }

    /// Assert `actual <rule> expected` for ordered values.
    pub fn assert_comparison<T>(
        &mut self,
        description: &str,
        actual: &T,
        rule: ComparisonRule,
        expected: &T,
    ) -> bool
    where
        T: PartialOrd + Display + ?Sized,
    {
        let passed = rule.compare(actual, expected);
        let details = format!("actual {actual} is expected to be {rule} {expected}");
        self.record(description, passed, details)
    }

    /// Assert a string against a [`StringComparisonRule`].
    ///
    /// An invalid regular expression is recorded as a failure.
    pub fn assert_string(
        &mut self,
        description: &str,
        actual: &str,
        rule: StringComparisonRule,
        expected: &str,
    ) -> bool {
        match rule.matches(actual, expected) {
            Ok(passed) => {
                let details = format!(
                    "\"{actual}\" is expected to {} \"{expected}\"",
                    rule.expectation()
                );
                self.record(description, passed, details)
            }
            Err(e) => self.record(description, false, e.to_string()),
        }
    }

    /// Record a failure directly, e.g. when a lookup produced no value.
    pub fn record_failure(&mut self, description: &str, details: impl Into<String>) {
        self.record(description, false, details.into());
    }

    pub fn records(&self) -> &[AssertionRecord] {
        &self.records
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionRecord> {
        self.records.iter().filter(|r| !r.passed)
    }

    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| !r.passed)
    }

    /// Fail with every recorded failure, one per line.
    pub fn verify(&self) -> Result<()> {
        let failures: Vec<String> = self.failures().map(ToString::to_string).collect();
        if failures.is_empty() {
            return Ok(());
        }
        Err(CoreError::AssertionsFailed {
            count: failures.len(),
            summary: failures.join("\n"),
        })
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
