//! Comparison rules used by assertion steps.
//!
//! Step phrases carry the rule as plain words, e.g.
//! `Then response code is greater than or equal to `200``. Both the words and
//! the constant form (`GREATER_THAN_OR_EQUAL_TO`) are accepted, as are the
//! usual operator symbols.

use std::str::FromStr;

use regex::Regex;
use strum::Display;

use crate::error::{CoreError, Result};

/// Normalize a rule phrase: lowercase, underscores to spaces, collapse
/// whitespace, drop a leading "is ".
fn normalize(phrase: &str) -> String {
    let lowered = phrase.trim().to_lowercase().replace('_', " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .strip_prefix("is ")
        .map(str::to_string)
        .unwrap_or(collapsed)
}

/// Ordering comparison between an actual and an expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ComparisonRule {
    #[strum(to_string = "less than")]
    LessThan,
    #[strum(to_string = "less than or equal to")]
    LessThanOrEqualTo,
    #[strum(to_string = "greater than")]
    GreaterThan,
    #[strum(to_string = "greater than or equal to")]
    GreaterThanOrEqualTo,
    #[strum(to_string = "equal to")]
    EqualTo,
    #[strum(to_string = "not equal to")]
    NotEqualTo,
}

impl ComparisonRule {
    /// Compare `actual` against `expected`.
    pub fn compare<T: PartialOrd + ?Sized>(self, actual: &T, expected: &T) -> bool {
        match self {
            Self::LessThan => actual < expected,
            Self::LessThanOrEqualTo => actual <= expected,
            Self::GreaterThan => actual > expected,
            Self::GreaterThanOrEqualTo => actual >= expected,
            Self::EqualTo => actual == expected,
            Self::NotEqualTo => actual != expected,
        }
    }

    /// Operator symbol, used in compact log output.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
            Self::EqualTo => "=",
            Self::NotEqualTo => "!=",
        }
    }
}

impl FromStr for ComparisonRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let rule = match normalize(s).as_str() {
            "less than" | "<" => Self::LessThan,
            "less than or equal to" | "<=" => Self::LessThanOrEqualTo,
            "greater than" | ">" => Self::GreaterThan,
            "greater than or equal to" | ">=" => Self::GreaterThanOrEqualTo,
            "equal to" | "equals" | "=" | "==" => Self::EqualTo,
            "not equal to" | "!=" | "<>" => Self::NotEqualTo,
            _ => return Err(CoreError::UnknownComparisonRule(s.to_string())),
        };
        Ok(rule)
    }
}

/// Rule for comparing string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StringComparisonRule {
    #[strum(to_string = "is equal to")]
    IsEqualTo,
    #[strum(to_string = "is equal to ignoring case")]
    IsEqualToIgnoringCase,
    #[strum(to_string = "contains")]
    Contains,
    #[strum(to_string = "does not contain")]
    DoesNotContain,
    #[strum(to_string = "matches")]
    Matches,
    #[strum(to_string = "does not match")]
    DoesNotMatch,
}

impl StringComparisonRule {
    /// Verb phrase completing "actual is expected to ...".
    pub fn expectation(self) -> &'static str {
        match self {
            Self::IsEqualTo => "be equal to",
            Self::IsEqualToIgnoringCase => "be equal ignoring case to",
            Self::Contains => "contain",
            Self::DoesNotContain => "not contain",
            Self::Matches => "match",
            Self::DoesNotMatch => "not match",
        }
    }

    /// Check `actual` against `expected`.
    ///
    /// `Matches` and `DoesNotMatch` treat `expected` as a regular expression
    /// that must match the whole string.
    pub fn matches(self, actual: &str, expected: &str) -> Result<bool> {
        let outcome = match self {
            Self::IsEqualTo => actual == expected,
            Self::IsEqualToIgnoringCase => actual.to_lowercase() == expected.to_lowercase(),
            Self::Contains => actual.contains(expected),
            Self::DoesNotContain => !actual.contains(expected),
            Self::Matches => full_match(expected)?.is_match(actual),
            Self::DoesNotMatch => !full_match(expected)?.is_match(actual),
        };
        Ok(outcome)
    }
}

fn full_match(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| CoreError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

impl FromStr for StringComparisonRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let rule = match normalize(s).as_str() {
            "equal to" | "=" | "==" => Self::IsEqualTo,
            "equal to ignoring case" => Self::IsEqualToIgnoringCase,
            "contains" | "contain" => Self::Contains,
            "does not contain" | "not contains" => Self::DoesNotContain,
            "matches" | "match" => Self::Matches,
            "does not match" | "not matches" => Self::DoesNotMatch,
            _ => return Err(CoreError::UnknownComparisonRule(s.to_string())),
        };
        Ok(rule)
    }
}
