//! Error types for the step core

use thiserror::Error;

/// Main error type for core step operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// One or more soft assertions failed
    #[error("{count} assertion(s) failed:\n{summary}")]
    AssertionsFailed { count: usize, summary: String },

    /// Unknown variable scope name
    #[error("Unknown variable scope: '{0}'. Expected one of STEP, SCENARIO, STORY, NEXT_BATCHES, GLOBAL")]
    UnknownScope(String),

    /// Empty scope set in a step argument
    #[error("At least one variable scope must be specified")]
    EmptyScopes,

    /// Global variables come from configuration only
    #[error("Global variables are read-only, cannot set '{0}'")]
    GlobalScopeIsReadOnly(String),

    /// Unknown comparison rule phrase
    #[error("Unknown comparison rule: '{0}'")]
    UnknownComparisonRule(String),

    /// Invalid regular expression in a `matches` rule
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Invalid duration argument
    #[error("Invalid duration: '{0}'. Expected e.g. PT5S, 5s, 500ms, 2m")]
    InvalidDuration(String),

    /// Malformed step table
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
