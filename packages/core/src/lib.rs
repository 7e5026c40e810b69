//! Stepweave Core
//!
//! Shared building blocks for BDD step libraries:
//! - [`soft_assert`]: assertion collector that defers failures to scenario end
//! - [`variables`]: scoped variable store and `${var}` placeholder resolution
//! - [`comparison`]: comparison rules parsed from step phrases
//! - [`wait`]: polling helper and duration parsing
//! - [`table`]: Gherkin data table helpers
//! - [`context`]: per-scenario context with lifecycle boundaries
//!
//! # Example
//!
//! ```
//! use stepweave_core::{ComparisonRule, TestContext, VariableScope};
//!
//! let mut ctx = TestContext::default();
//! ctx.variables_mut()
//!     .put_string(&[VariableScope::Scenario], "id", "42")
//!     .unwrap();
//! assert_eq!(ctx.resolve("/users/${id}"), "/users/42");
//!
//! ctx.soft_assert()
//!     .assert_comparison("status", &200, ComparisonRule::LessThan, &300);
//! assert!(ctx.finish_scenario().is_ok());
//! ```

pub mod comparison;
pub mod config;
pub mod context;
pub mod error;
pub mod soft_assert;
pub mod table;
pub mod variables;
pub mod wait;

pub use comparison::{ComparisonRule, StringComparisonRule};
pub use config::StepConfig;
pub use context::TestContext;
pub use error::{CoreError, Result};
pub use soft_assert::{AssertionRecord, SoftAssert};
pub use table::Table;
pub use variables::{VariableContext, VariableScope};
pub use wait::{parse_duration, wait_until, WaitOutcome, WaitSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
