//! Error types for web steps.

use thiserror::Error;

/// Main error type for the web step library.
#[derive(Debug, Error)]
pub enum WebError {
    /// Core step failure (variables, tables, rules).
    #[error(transparent)]
    Core(#[from] stepweave_core::CoreError),

    /// WebDriver session could not be created.
    #[error("Failed to start WebDriver session: {0}")]
    Session(String),

    /// WebDriver command failed.
    #[error("WebDriver command failed: {0}")]
    Driver(String),

    /// Element handle no longer refers to an element in the page.
    #[error("Element is no longer attached to the page")]
    StaleElement,

    /// Element lookup matched nothing where one was required.
    #[error("No element found by {0}")]
    NoSuchElement(String),

    /// Window handle does not exist (anymore).
    #[error("No such window: {0}")]
    NoSuchWindow(String),

    /// Locator text could not be parsed.
    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// Page URL could not be parsed or resolved.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Unknown keyword in a step argument (element state, scroll edge, ...).
    #[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
    UnknownKeyword {
        kind: &'static str,
        value: String,
        expected: String,
    },

    /// Script argument could not be converted.
    #[error("Invalid {kind} script argument '{value}'")]
    InvalidScriptArgument { kind: String, value: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WebError {
    /// Whether retrying with a freshly located element may succeed.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement)
    }
}

/// Result type alias for web step operations.
pub type Result<T> = std::result::Result<T, WebError>;
