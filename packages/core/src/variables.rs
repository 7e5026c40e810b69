//! Scoped variable store
//!
//! Steps pass values to later steps by saving them into one or more scopes.
//! A scope decides how long the value lives:
//!
//! - `STEP`: until the current step finishes
//! - `SCENARIO`: until the current scenario finishes
//! - `STORY`: until the current feature file finishes
//! - `NEXT_BATCHES`: from now on, across batches
//! - `GLOBAL`: read-only, seeded from configuration
//!
//! Lookups search the scopes from the shortest lifetime to the longest and
//! return the first hit.
//!
//! # Paths
//!
//! Values are JSON, so a variable reference can navigate into them:
//! `user.name`, `items[1]`, `items[0].id`.
//!
//! # Placeholders
//!
//! [`VariableContext::resolve`] replaces `${name}` placeholders in step
//! arguments. Unknown placeholders are kept verbatim and `$${` produces a
//! literal `${`.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::config::StepConfig;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableScope {
    Step,
    Scenario,
    Story,
    NextBatches,
    Global,
}

impl FromStr for VariableScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        VariableScope::iter()
            .find(|scope| scope.to_string() == normalized)
            .ok_or_else(|| CoreError::UnknownScope(s.to_string()))
    }
}

impl VariableScope {
    /// Parse a set like `scenario, story` or `SCENARIO STORY`.
    pub fn parse_set(text: &str) -> Result<BTreeSet<VariableScope>> {
        let scopes = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<BTreeSet<_>>>()?;

        if scopes.is_empty() {
            return Err(CoreError::EmptyScopes);
        }
        Ok(scopes)
    }
}

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\$\{([^{}]+)\}").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static INDEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\[\]]*)((?:\[\d+\])+)$").expect("valid regex"));

/// Variable store shared by all steps of a scenario.
#[derive(Debug, Default)]
pub struct VariableContext {
    scopes: HashMap<VariableScope, HashMap<String, Value>>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with global variables taken from the configuration.
    pub fn with_globals(config: &StepConfig) -> Self {
        let mut context = Self::new();
        let globals = context.scopes.entry(VariableScope::Global).or_default();
        for (name, value) in &config.global_variables {
            globals.insert(name.clone(), Value::String(value.clone()));
        }
        context
    }

    /// Store `value` under `name` in every given scope.
    pub fn put<'a, I>(&mut self, scopes: I, name: &str, value: Value) -> Result<()>
    where
        I: IntoIterator<Item = &'a VariableScope>,
    {
        let scopes: Vec<VariableScope> = scopes.into_iter().copied().collect();
        if scopes.contains(&VariableScope::Global) {
            return Err(CoreError::GlobalScopeIsReadOnly(name.to_string()));
        }
        if scopes.is_empty() {
            return Err(CoreError::EmptyScopes);
        }

        for scope in scopes {
            tracing::info!(%scope, name, value = %value, "saving variable");
            self.scopes
                .entry(scope)
                .or_default()
                .insert(name.to_string(), value.clone());
        }
        Ok(())
    }

    /// Convenience for string values.
    pub fn put_string<'a, I>(&mut self, scopes: I, name: &str, value: impl Into<String>) -> Result<()>
    where
        I: IntoIterator<Item = &'a VariableScope>,
    {
        self.put(scopes, name, Value::String(value.into()))
    }

    /// Look up a variable, navigating into it when `name` carries a path.
    pub fn get(&self, name: &str) -> Option<&Value> {
        for scope in VariableScope::iter() {
            let Some(vars) = self.scopes.get(&scope) else {
                continue;
            };
            if let Some(value) = lookup(vars, name) {
                return Some(value);
            }
        }
        None
    }

    /// Look up a variable rendered as text: strings unquoted, anything
    /// else as compact JSON.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(value_to_string)
    }

    pub fn clear(&mut self, scope: VariableScope) {
        if let Some(vars) = self.scopes.get_mut(&scope) {
            if !vars.is_empty() {
                tracing::debug!(%scope, count = vars.len(), "clearing variables");
            }
            vars.clear();
        }
    }

    /// Clear everything that does not outlive a lifecycle `boundary`: the
    /// scope itself and every shorter-lived one.
    ///
    /// `NEXT_BATCHES` and `GLOBAL` values are never dropped, so a batch
    /// boundary (`NextBatches`) clears step, scenario and story values only.
    pub fn clear_scope(&mut self, boundary: VariableScope) {
        for scope in VariableScope::iter()
            .filter(|scope| *scope <= boundary && *scope < VariableScope::NextBatches)
        {
            self.clear(scope);
        }
    }

    /// Replace `${name}` placeholders in `text`.
    pub fn resolve(&self, text: &str) -> String {
        PLACEHOLDER_PATTERN
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let whole = &caps[0];
                if let Some(escaped) = whole.strip_prefix('$').filter(|w| w.starts_with('$')) {
                    return escaped.to_string();
                }
                self.get_string(caps[1].trim())
                    .unwrap_or_else(|| whole.to_string())
            })
            .into_owned()
    }
}

/// Render a JSON value for substitution into text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Find the longest stored name that prefixes `name`, then walk the rest
/// of the path inside the value.
fn lookup<'a>(vars: &'a HashMap<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = vars.get(name) {
        return Some(value);
    }

    let mut cut = name.len();
    while let Some(pos) = name[..cut].rfind(['.', '[']) {
        cut = pos;
        let (head, rest) = name.split_at(pos);
        if let Some(value) = vars.get(head) {
            if let Some(found) = navigate(value, rest) {
                return Some(found);
            }
        }
    }
    None
}

/// Walk a `.key[0].other` style path inside `value`.
fn navigate<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (key, indices) = match INDEX_PATTERN.captures(segment) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str()),
            ),
            None => (segment, ""),
        };

        if !key.is_empty() {
            current = current.get(key)?;
        }
        for index in indices
            .split(['[', ']'])
            .filter(|s| !s.is_empty())
        {
            current = current.get(index.parse::<usize>().ok()?)?;
        }
    }
    Some(current)
}
