//! WebDriver session configuration.

use serde_json::{json, Map, Value};
use strum::{Display, EnumString};
use url::Url;

use crate::error::{Result, WebError};

/// WebDriver endpoint used when `STEPWEAVE_WEBDRIVER_URL` is not set.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// Relative page URLs are resolved against this.
    pub base_url: Option<Url>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WebConfig {
    pub fn new() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser: BrowserKind::default(),
            headless: true,
            base_url: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let webdriver_url = std::env::var("STEPWEAVE_WEBDRIVER_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string());

        let browser = std::env::var("STEPWEAVE_BROWSER")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default();

        let headless = std::env::var("STEPWEAVE_HEADLESS")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let base_url = match std::env::var("STEPWEAVE_BASE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_base_url(&raw)?),
            _ => None,
        };

        Ok(Self {
            webdriver_url,
            browser,
            headless,
            base_url,
        })
    }

    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    pub fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Some(parse_base_url(base_url)?);
        Ok(self)
    }

    /// Resolve a page URL from a step against the base URL.
    pub fn resolve_url(&self, raw: &str) -> Result<String> {
        match (Url::parse(raw), &self.base_url) {
            (Ok(url), _) => Ok(url.to_string()),
            (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => base
                .join(raw)
                .map(|url| url.to_string())
                .map_err(|e| WebError::InvalidUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                }),
            (Err(url::ParseError::RelativeUrlWithoutBase), None) => Err(WebError::InvalidUrl {
                url: raw.to_string(),
                reason: "relative URL without STEPWEAVE_BASE_URL".to_string(),
            }),
            (Err(e), _) => Err(WebError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// W3C capabilities for a new session.
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!(self.browser.to_string()));
        match self.browser {
            BrowserKind::Chrome => {
                let args: Vec<&str> = if self.headless {
                    vec!["--headless=new", "--disable-gpu"]
                } else {
                    vec![]
                };
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                let args: Vec<&str> = if self.headless { vec!["-headless"] } else { vec![] };
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| WebError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
