//! [`Browser`] over a WebDriver session, using `fantoccini`.

use async_trait::async_trait;
use fantoccini::cookies::Cookie;
use fantoccini::elements::{Element, ElementRef};
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::Value;

use crate::browser::{Browser, BrowserCookie, By, ElementHandle, ScriptArg};
use crate::config::WebConfig;
use crate::error::{Result, WebError};

pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Start a new session on the configured WebDriver endpoint.
    pub async fn connect(config: &WebConfig) -> Result<Self> {
        tracing::info!(
            webdriver = %config.webdriver_url,
            browser = %config.browser,
            headless = config.headless,
            "starting WebDriver session"
        );
        let client = ClientBuilder::native()
            .capabilities(config.capabilities())
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| WebError::Session(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn element(&self, handle: &ElementHandle) -> Element {
        Element::from_element_id(self.client.clone(), ElementRef::from(handle.id().to_string()))
    }

    fn script_args(&self, args: Vec<ScriptArg>) -> Result<Vec<Value>> {
        args.into_iter()
            .map(|arg| match arg {
                ScriptArg::Value(value) => Ok(value),
                ScriptArg::Element(handle) => Ok(serde_json::to_value(self.element(&handle))?),
            })
            .collect()
    }
}

fn handle_of(element: &Element) -> ElementHandle {
    ElementHandle::new(element.element_id().to_string())
}

fn wd_locator(by: &By) -> WdLocator<'_> {
    match by {
        By::Css(css) => WdLocator::Css(css),
        By::XPath(xpath) => WdLocator::XPath(xpath),
        By::Id(id) => WdLocator::Id(id),
        By::LinkText(text) => WdLocator::LinkText(text),
    }
}

fn map_cmd_error(error: CmdError) -> WebError {
    if error.is_no_such_element() {
        return WebError::NoSuchElement(error.to_string());
    }
    match &error {
        CmdError::Standard(wd) if wd.error == ErrorStatus::StaleElementReference => {
            WebError::StaleElement
        }
        CmdError::Standard(wd) if wd.error == ErrorStatus::NoSuchWindow => {
            WebError::NoSuchWindow(error.to_string())
        }
        _ => WebError::Driver(error.to_string()),
    }
}

fn to_browser_cookie(cookie: &Cookie<'_>) -> BrowserCookie {
    BrowserCookie {
        name: cookie.name().to_string(),
        value: cookie.value().to_string(),
        path: cookie.path().map(str::to_string),
        domain: cookie.domain().map(str::to_string),
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(map_cmd_error)
    }

    async fn refresh(&self) -> Result<()> {
        self.client.refresh().await.map_err(map_cmd_error)
    }

    async fn back(&self) -> Result<()> {
        self.client.back().await.map_err(map_cmd_error)
    }

    async fn forward(&self) -> Result<()> {
        self.client.forward().await.map_err(map_cmd_error)
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.client.current_url().await.map_err(map_cmd_error)?;
        Ok(url.to_string())
    }

    async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(map_cmd_error)
    }

    async fn find_elements(
        &self,
        root: Option<&ElementHandle>,
        by: &By,
    ) -> Result<Vec<ElementHandle>> {
        let found = match root {
            Some(root) => self.element(root).find_all(wd_locator(by)).await,
            None => self.client.find_all(wd_locator(by)).await,
        }
        .map_err(map_cmd_error)?;
        Ok(found.iter().map(handle_of).collect())
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        self.element(element).click().await.map_err(map_cmd_error)
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()> {
        self.element(element)
            .send_keys(text)
            .await
            .map_err(map_cmd_error)
    }

    async fn clear(&self, element: &ElementHandle) -> Result<()> {
        self.element(element).clear().await.map_err(map_cmd_error)
    }

    async fn text(&self, element: &ElementHandle) -> Result<String> {
        self.element(element).text().await.map_err(map_cmd_error)
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        self.element(element).attr(name).await.map_err(map_cmd_error)
    }

    async fn css_value(&self, element: &ElementHandle, property: &str) -> Result<String> {
        self.element(element)
            .css_value(property)
            .await
            .map_err(map_cmd_error)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
        self.element(element)
            .is_displayed()
            .await
            .map_err(map_cmd_error)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool> {
        self.element(element)
            .is_enabled()
            .await
            .map_err(map_cmd_error)
    }

    async fn is_selected(&self, element: &ElementHandle) -> Result<bool> {
        self.element(element)
            .is_selected()
            .await
            .map_err(map_cmd_error)
    }

    async fn tag_name(&self, element: &ElementHandle) -> Result<String> {
        self.element(element).tag_name().await.map_err(map_cmd_error)
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        let args = self.script_args(args)?;
        self.client
            .execute(script, args)
            .await
            .map_err(map_cmd_error)
    }

    async fn execute_async_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        let args = self.script_args(args)?;
        self.client
            .execute_async(script, args)
            .await
            .map_err(map_cmd_error)
    }

    async fn add_cookie(&self, cookie: BrowserCookie) -> Result<()> {
        let mut wd_cookie = Cookie::new(cookie.name, cookie.value);
        if let Some(path) = cookie.path {
            wd_cookie.set_path(path);
        }
        if let Some(domain) = cookie.domain {
            wd_cookie.set_domain(domain);
        }
        self.client
            .add_cookie(wd_cookie)
            .await
            .map_err(map_cmd_error)
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>> {
        let cookies = self
            .client
            .get_all_cookies()
            .await
            .map_err(map_cmd_error)?;
        Ok(cookies.iter().map(to_browser_cookie).collect())
    }

    async fn delete_cookie(&self, name: &str) -> Result<()> {
        self.client.delete_cookie(name).await.map_err(map_cmd_error)
    }

    async fn delete_all_cookies(&self) -> Result<()> {
        self.client
            .delete_all_cookies()
            .await
            .map_err(map_cmd_error)
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        let handles = self.client.windows().await.map_err(map_cmd_error)?;
        Ok(handles.into_iter().map(String::from).collect())
    }

    async fn current_window(&self) -> Result<String> {
        let handle = self.client.window().await.map_err(map_cmd_error)?;
        Ok(String::from(handle))
    }

    async fn switch_to_window(&self, handle: &str) -> Result<()> {
        let window = WindowHandle::try_from(handle.to_string())
            .map_err(|_| WebError::NoSuchWindow(handle.to_string()))?;
        self.client
            .switch_to_window(window)
            .await
            .map_err(map_cmd_error)
    }

    async fn new_tab(&self) -> Result<String> {
        let created = self.client.new_window(true).await.map_err(map_cmd_error)?;
        Ok(String::from(created.handle))
    }

    async fn close_window(&self) -> Result<()> {
        self.client.close_window().await.map_err(map_cmd_error)
    }

    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<()> {
        self.element(frame).enter_frame().await.map_err(map_cmd_error)
    }

    async fn switch_to_parent_frame(&self) -> Result<()> {
        self.client
            .enter_parent_frame()
            .await
            .map_err(map_cmd_error)
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.client.enter_frame(None).await.map_err(map_cmd_error)
    }

    async fn quit(&self) -> Result<()> {
        tracing::info!("closing WebDriver session");
        self.client.clone().close().await.map_err(map_cmd_error)
    }
}
