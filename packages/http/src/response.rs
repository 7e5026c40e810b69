//! Last HTTP response and the JSON cursor derived from it.

use std::time::Duration;

use serde_json::Value;

use crate::error::{HttpError, Result};
use crate::json_path;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub method: String,
    pub url: String,
    pub status: u16,
    /// Headers in the order received; names keep their original case.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub response_time: Duration,
}

impl HttpResponse {
    /// Values of every header named `name`, compared case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Holder of the last response received in the scenario.
#[derive(Debug, Default)]
pub struct ResponseHolder {
    last: Option<HttpResponse>,
    json_cursor: Option<Value>,
}

impl ResponseHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the last response; the JSON cursor returns to the body root.
    pub fn set(&mut self, response: HttpResponse) {
        self.last = Some(response);
        self.json_cursor = None;
    }

    pub fn last(&self) -> Option<&HttpResponse> {
        self.last.as_ref()
    }

    /// JSON at the cursor, or the whole body when the cursor was not moved.
    pub fn json_context(&self) -> Result<Value> {
        if let Some(cursor) = &self.json_cursor {
            return Ok(cursor.clone());
        }
        self.last.as_ref().ok_or(HttpError::NoResponse)?.json()
    }

    /// Move the cursor to the single element `path` selects in the current context.
    pub fn set_json_context(&mut self, path: &str) -> Result<()> {
        let context = self.json_context()?;
        let selected = json_path::select(&context, path)?;
        match selected.as_slice() {
            [single] => {
                self.json_cursor = Some((*single).clone());
                Ok(())
            }
            other => Err(HttpError::AmbiguousJsonContext {
                path: path.to_string(),
                found: other.len(),
            }),
        }
    }

    pub fn reset_json_context(&mut self) {
        self.json_cursor = None;
    }

    pub fn clear(&mut self) {
        self.last = None;
        self.json_cursor = None;
    }
}
