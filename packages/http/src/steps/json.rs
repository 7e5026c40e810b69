use std::collections::BTreeSet;

use serde_json::Value;
use stepweave_core::variables::value_to_string;
use stepweave_core::{ComparisonRule, StringComparisonRule, TestContext, VariableScope};

use crate::error::{HttpError, Result};
use crate::json_path;
use crate::session::HttpSession;
use crate::steps::NO_RESPONSE;

/// Steps navigating and checking the JSON body of the last response.
pub struct JsonSteps<'a> {
    session: &'a mut HttpSession,
    context: &'a mut TestContext,
}

impl<'a> JsonSteps<'a> {
    pub fn new(session: &'a mut HttpSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I change JSON context to element by JSON path `$path` ``
    ///
    /// Later JSON steps evaluate their paths against the selected element.
    pub fn change_json_context(&mut self, path: &str) -> Result<()> {
        let path = self.context.resolve(path);
        tracing::info!(%path, "changing JSON context");
        let description = format!("JSON context is changed to '{path}'");
        match self.session.responses.set_json_context(&path) {
            Ok(()) => Ok(()),
            Err(HttpError::NoResponse) => {
                self.context.soft_assert().record_failure(&description, NO_RESPONSE);
                Ok(())
            }
            Err(e @ (HttpError::AmbiguousJsonContext { .. } | HttpError::Json(_))) => {
                self.context.soft_assert().record_failure(&description, e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// `When I reset JSON context`
    pub fn reset_json_context(&mut self) {
        tracing::info!("resetting JSON context");
        self.session.responses.reset_json_context();
    }

    /// ``Then JSON element value from context by JSON path `$path` $rule `$value` ``
    ///
    /// Strings compare by their content, other values by their JSON text.
    pub fn json_element_value(
        &mut self,
        path: &str,
        rule: StringComparisonRule,
        value: &str,
    ) -> Result<bool> {
        let path = self.context.resolve(path);
        let expected = self.context.resolve(value);
        let description = format!("Value of JSON element by path '{path}'");
        let Some(element) = self.single_element(&path, &description)? else {
            return Ok(false);
        };
        let actual = value_to_string(&element);
        Ok(self
            .context
            .soft_assert()
            .assert_string(&description, &actual, rule, &expected))
    }

    /// ``Then number of JSON elements by JSON path `$path` is $rule `$n` ``
    pub fn number_of_json_elements(&mut self, path: &str, rule: ComparisonRule, n: usize) -> Result<bool> {
        let path = self.context.resolve(path);
        let description = format!("Number of JSON elements by path '{path}'");
        let Some(json) = self.json_context(&description) else {
            return Ok(false);
        };
        let count = json_path::select(&json, &path)?.len();
        Ok(self
            .context
            .soft_assert()
            .assert_comparison(&description, &count, rule, &n))
    }

    /// ``When I save JSON element value from context by JSON path `$path` to $scopes variable `$var` ``
    ///
    /// Objects and arrays are stored as structured values, so later steps can
    /// reach into them with `${var.field}` or `${var[0]}`.
    pub fn save_json_element(
        &mut self,
        path: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let path = self.context.resolve(path);
        let variable = self.context.resolve(variable);
        let description = format!("JSON element by path '{path}' is saved");
        let Some(element) = self.single_element(&path, &description)? else {
            return Ok(());
        };
        self.context.variables_mut().put(scopes, &variable, element)?;
        Ok(())
    }

    /// JSON at the current context, or a soft failure when it is unavailable.
    fn json_context(&mut self, description: &str) -> Option<Value> {
        match self.session.responses.json_context() {
            Ok(json) => Some(json),
            Err(HttpError::NoResponse) => {
                self.context.soft_assert().record_failure(description, NO_RESPONSE);
                None
            }
            Err(e) => {
                self.context
                    .soft_assert()
                    .record_failure(description, format!("response body is not JSON: {e}"));
                None
            }
        }
    }

    /// The one element `path` selects; any other count is a soft failure.
    fn single_element(&mut self, path: &str, description: &str) -> Result<Option<Value>> {
        let Some(json) = self.json_context(description) else {
            return Ok(None);
        };
        let selected = json_path::select(&json, path)?;
        match selected.as_slice() {
            [single] => Ok(Some((*single).clone())),
            other => {
                self.context.soft_assert().record_failure(
                    description,
                    format!("expected exactly one element by path '{path}', found {}", other.len()),
                );
                Ok(None)
            }
        }
    }
}
