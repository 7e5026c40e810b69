//! Element locators.
//!
//! Steps take locators as text:
//!
//! ```text
//! [By.]<strategy>(<value>)[:<v|i|a>][->filter.<type>(<arg>)]*
//! ```
//!
//! For example `By.xpath((//a)[1])`, `cssSelector(.item):a` or
//! `tagName(button)->filter.textPart(Save)->filter.attribute(type=submit)`.
//! The visibility suffix selects visible (`v`, the default), invisible (`i`)
//! or all (`a`) elements.

use std::fmt;
use std::str::FromStr;

use strum::Display;

use crate::browser::By;
use crate::error::{Result, WebError};

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SearchStrategy {
    #[strum(to_string = "xpath")]
    Xpath,
    #[strum(to_string = "cssSelector")]
    CssSelector,
    #[strum(to_string = "id")]
    Id,
    #[strum(to_string = "name")]
    Name,
    #[strum(to_string = "className")]
    ClassName,
    #[strum(to_string = "tagName")]
    TagName,
    #[strum(to_string = "linkText")]
    LinkText,
    #[strum(to_string = "partialLinkText")]
    PartialLinkText,
    #[strum(to_string = "caseSensitiveText")]
    CaseSensitiveText,
    #[strum(to_string = "caseInsensitiveText")]
    CaseInsensitiveText,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let strategy = match s.trim().to_ascii_lowercase().as_str() {
            "xpath" => Self::Xpath,
            "cssselector" | "css" => Self::CssSelector,
            "id" => Self::Id,
            "name" => Self::Name,
            "classname" => Self::ClassName,
            "tagname" => Self::TagName,
            "linktext" => Self::LinkText,
            "partiallinktext" => Self::PartialLinkText,
            "casesensitivetext" => Self::CaseSensitiveText,
            "caseinsensitivetext" => Self::CaseInsensitiveText,
            _ => return Err(format!("unknown search strategy '{}'", s.trim())),
        };
        Ok(strategy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    All,
}

impl Visibility {
    fn suffix(self) -> Option<char> {
        match self {
            Self::Visible => None,
            Self::Invisible => Some('i'),
            Self::All => Some('a'),
        }
    }
}

/// Post-search filter applied to located elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorFilter {
    /// Element text contains the argument.
    TextPart(String),
    /// Element text equals the argument (surrounding whitespace ignored).
    Text(String),
    /// Attribute equals a value, or is merely present when `value` is `None`.
    Attribute { name: String, value: Option<String> },
}

impl fmt::Display for LocatorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextPart(text) => write!(f, "->filter.textPart({text})"),
            Self::Text(text) => write!(f, "->filter.text({text})"),
            Self::Attribute { name, value: None } => write!(f, "->filter.attribute({name})"),
            Self::Attribute {
                name,
                value: Some(value),
            } => write!(f, "->filter.attribute({name}={value})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub strategy: SearchStrategy,
    pub value: String,
    pub visibility: Visibility,
    pub filters: Vec<LocatorFilter>,
}

impl Locator {
    pub fn new(strategy: SearchStrategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
            visibility: Visibility::default(),
            filters: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_filter(mut self, filter: LocatorFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn parse(text: &str) -> Result<Self> {
        let input = text.trim();
        let invalid = |reason: String| WebError::InvalidLocator {
            locator: text.to_string(),
            reason,
        };

        let rest = match input.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("by.") => &input[3..],
            _ => input,
        };
        let open = rest
            .find('(')
            .ok_or_else(|| invalid("expected '<strategy>(<value>)'".to_string()))?;
        let strategy: SearchStrategy = rest[..open].parse().map_err(invalid)?;
        let (value, mut rest) = take_parenthesized(&rest[open..])
            .ok_or_else(|| invalid("unbalanced parentheses".to_string()))?;
        if value.trim().is_empty() {
            return Err(invalid("empty locator value".to_string()));
        }

        let mut locator = Locator::new(strategy, value);

        if let Some(after_colon) = rest.strip_prefix(':') {
            let end = after_colon.find("->").unwrap_or(after_colon.len());
            locator.visibility = match after_colon[..end].trim().to_ascii_lowercase().as_str() {
                "v" => Visibility::Visible,
                "i" => Visibility::Invisible,
                "a" => Visibility::All,
                other => return Err(invalid(format!("unknown visibility '{other}'"))),
            };
            rest = &after_colon[end..];
        }

        while let Some(after_arrow) = rest.trim_start().strip_prefix("->") {
            let filter = match after_arrow.get(..7) {
                Some(prefix) if prefix.eq_ignore_ascii_case("filter.") => &after_arrow[7..],
                _ => return Err(invalid("expected '->filter.<type>(<arg>)'".to_string())),
            };
            let open = filter
                .find('(')
                .ok_or_else(|| invalid("expected '(' after filter type".to_string()))?;
            let kind = filter[..open].trim().to_ascii_lowercase();
            let (arg, remainder) = take_parenthesized(&filter[open..])
                .ok_or_else(|| invalid("unbalanced parentheses in filter".to_string()))?;
            let filter = match kind.as_str() {
                "textpart" => LocatorFilter::TextPart(arg.to_string()),
                "text" => LocatorFilter::Text(arg.to_string()),
                "attribute" => match arg.split_once('=') {
                    Some((name, value)) => LocatorFilter::Attribute {
                        name: name.trim().to_string(),
                        value: Some(value.to_string()),
                    },
                    None => LocatorFilter::Attribute {
                        name: arg.trim().to_string(),
                        value: None,
                    },
                },
                other => return Err(invalid(format!("unknown filter type '{other}'"))),
            };
            locator.filters.push(filter);
            rest = remainder;
        }

        if !rest.trim().is_empty() {
            return Err(invalid(format!("unexpected trailing text '{}'", rest.trim())));
        }
        Ok(locator)
    }

    /// Lower the locator to a search the browser executes natively.
    pub fn to_search(&self) -> By {
        let value = &self.value;
        match self.strategy {
            SearchStrategy::Xpath => By::XPath(value.clone()),
            SearchStrategy::CssSelector => By::Css(value.clone()),
            SearchStrategy::Id => By::Id(value.clone()),
            SearchStrategy::Name => By::Css(format!("[name={}]", css_string(value))),
            SearchStrategy::ClassName => By::Css(
                value
                    .split_whitespace()
                    .map(|class| format!(".{}", css_ident(class)))
                    .collect(),
            ),
            SearchStrategy::TagName => By::Css(value.trim().to_string()),
            SearchStrategy::LinkText => By::LinkText(value.clone()),
            SearchStrategy::PartialLinkText => By::XPath(format!(
                ".//a[contains(normalize-space(.), {})]",
                xpath_literal(value)
            )),
            SearchStrategy::CaseSensitiveText => {
                By::XPath(text_xpath("normalize-space(.)", &xpath_literal(value.trim())))
            }
            SearchStrategy::CaseInsensitiveText => {
                let expr = format!("translate(normalize-space(.), '{UPPER}', '{LOWER}')");
                let literal = xpath_literal(&value.trim().to_ascii_lowercase());
                By::XPath(text_xpath(&expr, &literal))
            }
        }
    }
}

impl FromStr for Locator {
    type Err = WebError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By.{}({})", self.strategy, self.value)?;
        if let Some(suffix) = self.visibility.suffix() {
            write!(f, ":{suffix}")?;
        }
        for filter in &self.filters {
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

/// Split `(inner)rest` into `inner` and `rest`.
///
/// Parentheses inside quoted strings do not count. When quotes do not pair
/// up (`caseSensitiveText(Don't)`), every parenthesis counts.
fn take_parenthesized(text: &str) -> Option<(&str, &str)> {
    balanced_close(text, true)
        .or_else(|| balanced_close(text, false))
        .map(|close| (&text[1..close], &text[close + 1..]))
}

fn balanced_close(text: &str, honor_quotes: bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') if honor_quotes => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Deepest elements whose text expression equals `literal`.
fn text_xpath(expr: &str, literal: &str) -> String {
    format!(".//*[{expr}={literal} and not(.//*[{expr}={literal}])]")
}

/// Quote `text` as an XPath string literal.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts: Vec<String> = text.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

fn css_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn css_ident(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            escaped.push_str(&format!("\\3{c} "));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}
