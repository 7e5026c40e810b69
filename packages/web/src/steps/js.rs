use std::collections::BTreeSet;

use serde_json::{Number, Value};
use stepweave_core::{Table, TestContext, VariableScope};
use strum::{Display, EnumString, VariantNames};

use super::parse_keyword;
use crate::browser::ScriptArg;
use crate::error::{Result, WebError};
use crate::session::WebSession;

/// Type column of a script argument table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ScriptArgType {
    String,
    Number,
    Boolean,
    Json,
}

impl ScriptArgType {
    pub fn parse(text: &str) -> Result<Self> {
        parse_keyword("script argument type", text)
    }

    pub fn convert(self, value: &str) -> Result<Value> {
        let invalid = || WebError::InvalidScriptArgument {
            kind: self.to_string(),
            value: value.to_string(),
        };
        Ok(match self {
            Self::String => Value::String(value.to_string()),
            Self::Number => Value::Number(value.trim().parse::<Number>().map_err(|_| invalid())?),
            Self::Boolean => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(invalid()),
            },
            Self::Json => serde_json::from_str(value).map_err(|_| invalid())?,
        })
    }
}

/// JavaScript execution in the current page.
pub struct JavascriptSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> JavascriptSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I execute javascript `$script` ``
    pub async fn execute_script(&mut self, script: &str) -> Result<()> {
        let script = self.context.resolve(script);
        tracing::info!(length = script.len(), "executing javascript");
        self.session.browser.execute_script(&script, Vec::new()).await?;
        Ok(())
    }

    /// ``When I execute javascript `$script` with arguments: $args``
    ///
    /// Columns: `type` (`STRING`, `NUMBER`, `BOOLEAN` or `JSON`) and `value`.
    pub async fn execute_script_with_arguments(&mut self, script: &str, args: &Table) -> Result<()> {
        let script = self.context.resolve(script);
        let mut values = Vec::with_capacity(args.len());
        for row in 0..args.len() {
            let kind = ScriptArgType::parse(args.required(row, "type")?)?;
            let value = self.context.resolve(args.required(row, "value")?);
            values.push(ScriptArg::Value(kind.convert(&value)?));
        }
        tracing::info!(arguments = values.len(), "executing javascript");
        self.session.browser.execute_script(&script, values).await?;
        Ok(())
    }

    /// ``When I execute javascript `$script` and save result to $scopes variable `$var` ``
    pub async fn execute_script_and_save(
        &mut self,
        script: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let script = self.context.resolve(script);
        let result = self.session.browser.execute_script(&script, Vec::new()).await?;
        self.save_result(result, scopes, variable)
    }

    /// ``When I execute async javascript `$script` and save result to $scopes variable `$var` ``
    ///
    /// The script signals completion by calling the callback passed as its
    /// last argument.
    pub async fn execute_async_script_and_save(
        &mut self,
        script: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let script = self.context.resolve(script);
        let result = self
            .session
            .browser
            .execute_async_script(&script, Vec::new())
            .await?;
        self.save_result(result, scopes, variable)
    }

    /// Structured results are kept as JSON so paths like `${var.field}` work.
    fn save_result(
        &mut self,
        result: Value,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let variable = self.context.resolve(variable);
        if result.is_null() {
            self.context
                .soft_assert()
                .record_failure("JavaScript returned a result", "result is null");
            return Ok(());
        }
        self.context.variables_mut().put(scopes, &variable, result)?;
        Ok(())
    }
}
