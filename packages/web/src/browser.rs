//! Browser seam.
//!
//! Steps talk to the browser only through [`Browser`], so they can run
//! against a real WebDriver session ([`WebDriverBrowser`](crate::driver::WebDriverBrowser))
//! or an in-memory fake in tests.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Opaque reference to an element in the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {}", self.0)
    }
}

/// Search mechanism the browser understands natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    Css(String),
    XPath(String),
    Id(String),
    LinkText(String),
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(v) => write!(f, "css selector '{v}'"),
            Self::XPath(v) => write!(f, "xpath '{v}'"),
            Self::Id(v) => write!(f, "id '{v}'"),
            Self::LinkText(v) => write!(f, "link text '{v}'"),
        }
    }
}

/// Script argument: a plain JSON value or an element reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Value(Value),
    Element(ElementHandle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
}

impl BrowserCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Primitive browser operations the steps are built from.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;
    async fn refresh(&self) -> Result<()>;
    async fn back(&self) -> Result<()>;
    async fn forward(&self) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    async fn title(&self) -> Result<String>;

    /// Elements matching `by` below `root`, or in the whole document when
    /// `root` is `None`. Returned in document order.
    async fn find_elements(&self, root: Option<&ElementHandle>, by: &By)
        -> Result<Vec<ElementHandle>>;

    async fn click(&self, element: &ElementHandle) -> Result<()>;
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()>;
    async fn clear(&self, element: &ElementHandle) -> Result<()>;
    async fn text(&self, element: &ElementHandle) -> Result<String>;
    async fn attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>>;
    async fn css_value(&self, element: &ElementHandle, property: &str) -> Result<String>;
    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool>;
    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool>;
    async fn is_selected(&self, element: &ElementHandle) -> Result<bool>;
    async fn tag_name(&self, element: &ElementHandle) -> Result<String>;

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value>;
    async fn execute_async_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value>;

    async fn add_cookie(&self, cookie: BrowserCookie) -> Result<()>;
    async fn cookies(&self) -> Result<Vec<BrowserCookie>>;
    async fn delete_cookie(&self, name: &str) -> Result<()>;
    async fn delete_all_cookies(&self) -> Result<()>;

    async fn window_handles(&self) -> Result<Vec<String>>;
    async fn current_window(&self) -> Result<String>;
    async fn switch_to_window(&self, handle: &str) -> Result<()>;
    /// Open a tab and return its handle; focus stays on the current window.
    async fn new_tab(&self) -> Result<String>;
    async fn close_window(&self) -> Result<()>;

    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<()>;
    async fn switch_to_parent_frame(&self) -> Result<()>;
    async fn switch_to_default_content(&self) -> Result<()>;

    async fn quit(&self) -> Result<()>;
}
