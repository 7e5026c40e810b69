//! Per-scenario browser state shared by the web steps.

use std::sync::Arc;

use crate::browser::Browser;
use crate::config::WebConfig;
use crate::context::SearchContextStack;
use crate::driver::WebDriverBrowser;
use crate::error::Result;
use crate::search::ElementSearch;

pub struct WebSession {
    pub browser: Arc<dyn Browser>,
    pub contexts: SearchContextStack,
    pub config: WebConfig,
}

impl WebSession {
    pub fn new(browser: Arc<dyn Browser>, config: WebConfig) -> Self {
        Self {
            browser,
            contexts: SearchContextStack::new(),
            config,
        }
    }

    /// Start a WebDriver session for `config`.
    pub async fn connect(config: WebConfig) -> Result<Self> {
        let browser = WebDriverBrowser::connect(&config).await?;
        Ok(Self::new(Arc::new(browser), config))
    }

    pub async fn from_env() -> Result<Self> {
        Self::connect(WebConfig::from_env()?).await
    }

    /// Search scoped to the current search context.
    pub fn search(&self) -> ElementSearch<'_> {
        ElementSearch::new(self.browser.as_ref(), self.contexts.current_root())
    }

    /// Leave frames and element contexts so the next scenario starts at the page.
    pub async fn finish_scenario(&mut self) -> Result<()> {
        let in_frame = self.contexts.frame_depth() > 0;
        self.contexts.reset();
        if in_frame {
            self.browser.switch_to_default_content().await?;
        }
        Ok(())
    }

    pub async fn quit(&self) -> Result<()> {
        self.browser.quit().await
    }
}
