//! Error types for HTTP steps.

use thiserror::Error;

/// Main error type for the HTTP step library.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Core step failure (variables, tables, rules).
    #[error(transparent)]
    Core(#[from] stepweave_core::CoreError),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// All retry attempts failed.
    #[error("HTTP request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// URL could not be parsed or resolved.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Unsupported HTTP method.
    #[error("Invalid HTTP method: '{0}'")]
    InvalidMethod(String),

    /// Invalid header name or value.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// JSON path syntax error.
    #[error("Invalid JSON path '{path}': {reason}")]
    InvalidJsonPath { path: String, reason: String },

    /// JSON context can only move to a single element.
    #[error("JSON path '{path}' must select exactly one element, found {found}")]
    AmbiguousJsonContext { path: String, found: usize },

    /// Step needs a response but none was received yet.
    #[error("No HTTP response received")]
    NoResponse,

    /// Response body is not JSON.
    #[error("Response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown multipart part type in a step table.
    #[error("Unknown multipart part type '{0}'. Expected STRING or FILE")]
    InvalidPartType(String),
}

/// Result type alias for HTTP step operations.
pub type Result<T> = std::result::Result<T, HttpError>;
