use std::collections::BTreeSet;

use stepweave_core::{ComparisonRule, StringComparisonRule, TestContext, VariableScope};

use super::require_response;
use crate::client::millis;
use crate::error::Result;
use crate::session::HttpSession;

/// Assertions on the last HTTP response, and saving parts of it.
pub struct HttpResponseSteps<'a> {
    session: &'a mut HttpSession,
    context: &'a mut TestContext,
}

impl<'a> HttpResponseSteps<'a> {
    pub fn new(session: &'a mut HttpSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``Then response code is $rule `$code` ``
    pub fn response_code_is(&mut self, rule: ComparisonRule, code: u16) -> bool {
        let description = "HTTP response status code";
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), description)
        else {
            return false;
        };
        tracing::info!(status = response.status, %rule, expected = code, "checking response code");
        self.context
            .soft_assert()
            .assert_comparison(description, &response.status, rule, &code)
    }

    /// ``Then response time is $rule `$millis` milliseconds``
    pub fn response_time_is(&mut self, rule: ComparisonRule, expected_millis: u64) -> bool {
        let description = "HTTP response time in milliseconds";
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), description)
        else {
            return false;
        };
        let actual = millis(response.response_time);
        self.context
            .soft_assert()
            .assert_comparison(description, &actual, rule, &expected_millis)
    }

    /// ``Then number of response headers with name `$name` is $rule `$n` ``
    pub fn number_of_response_headers(&mut self, name: &str, rule: ComparisonRule, n: usize) -> bool {
        let name = self.context.resolve(name);
        let description = format!("Number of response headers with name '{name}'");
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), &description)
        else {
            return false;
        };
        let count = response.header_values(&name).len();
        self.context
            .soft_assert()
            .assert_comparison(&description, &count, rule, &n)
    }

    /// ``Then value of response header `$name` $rule `$value` ``
    ///
    /// Every header with that name must satisfy the rule.
    pub fn response_header_value(
        &mut self,
        name: &str,
        rule: StringComparisonRule,
        value: &str,
    ) -> bool {
        let name = self.context.resolve(name);
        let expected = self.context.resolve(value);
        let description = format!("Value of response header '{name}'");
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), &description)
        else {
            return false;
        };
        let values = response.header_values(&name);
        if values.is_empty() {
            self.context
                .soft_assert()
                .record_failure(&description, format!("header '{name}' is not present"));
            return false;
        }
        let mut passed = true;
        for actual in values {
            passed &= self
                .context
                .soft_assert()
                .assert_string(&description, actual, rule, &expected);
        }
        passed
    }

    /// ``Then response body $rule `$value` ``
    pub fn response_body(&mut self, rule: StringComparisonRule, value: &str) -> bool {
        let expected = self.context.resolve(value);
        let description = "HTTP response body";
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), description)
        else {
            return false;
        };
        let body = response.body_text();
        self.context
            .soft_assert()
            .assert_string(description, &body, rule, &expected)
    }

    /// `Then response does not contain body`
    pub fn response_does_not_contain_body(&mut self) -> bool {
        let description = "HTTP response does not contain body";
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), description)
        else {
            return false;
        };
        let has_body = response.has_body();
        self.context.soft_assert().assert_false(description, has_body)
    }

    /// ``When I save response header `$name` value to $scopes variable `$var` ``
    ///
    /// Saves the first header with that name.
    pub fn save_response_header(
        &mut self,
        name: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let name = self.context.resolve(name);
        let variable = self.context.resolve(variable);
        let description = format!("Response header '{name}' is present");
        let Some(response) =
            require_response(&self.session.responses, self.context.soft_assert(), &description)
        else {
            return Ok(());
        };
        let Some(value) = response.header_values(&name).first().map(|v| v.to_string()) else {
            self.context
                .soft_assert()
                .record_failure(&description, format!("header '{name}' is not present"));
            return Ok(());
        };
        self.context
            .variables_mut()
            .put_string(scopes, &variable, value)?;
        Ok(())
    }

    /// ``When I save response body to $scopes variable `$var` ``
    pub fn save_response_body(&mut self, scopes: &BTreeSet<VariableScope>, variable: &str) -> Result<()> {
        let Some(response) = require_response(
            &self.session.responses,
            self.context.soft_assert(),
            "HTTP response body is saved",
        ) else {
            return Ok(());
        };
        let body = response.body_text();
        let variable = self.context.resolve(variable);
        self.context.variables_mut().put_string(scopes, &variable, body)?;
        Ok(())
    }

    /// ``When I save cURL command of last request to $scopes variable `$var` ``
    pub fn save_curl_command(&mut self, scopes: &BTreeSet<VariableScope>, variable: &str) -> Result<()> {
        let Some(request) = self.session.client.last_request() else {
            self.context
                .soft_assert()
                .record_failure("cURL command is saved", "No HTTP request executed");
            return Ok(());
        };
        let curl = request.to_curl();
        let variable = self.context.resolve(variable);
        self.context.variables_mut().put_string(scopes, &variable, curl)?;
        Ok(())
    }
}
