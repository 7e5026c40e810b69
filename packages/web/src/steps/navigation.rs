use stepweave_core::{StringComparisonRule, TestContext};

use crate::error::Result;
use crate::session::WebSession;

/// Page navigation and page-level assertions.
pub struct NavigationSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> NavigationSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``Given I am on page with URL `$url` ``
    ///
    /// Relative URLs are resolved against the configured base URL.
    pub async fn open_page(&mut self, url: &str) -> Result<()> {
        let url = self.session.config.resolve_url(&self.context.resolve(url))?;
        tracing::info!(%url, "opening page");
        self.session.browser.navigate(&url).await?;
        self.session.contexts.reset();
        Ok(())
    }

    /// `When I refresh page`
    pub async fn refresh_page(&mut self) -> Result<()> {
        tracing::info!("refreshing page");
        self.session.browser.refresh().await?;
        self.session.contexts.reset();
        Ok(())
    }

    /// `When I navigate back`
    pub async fn navigate_back(&mut self) -> Result<()> {
        self.session.browser.back().await?;
        self.session.contexts.reset();
        Ok(())
    }

    /// `When I navigate forward`
    pub async fn navigate_forward(&mut self) -> Result<()> {
        self.session.browser.forward().await?;
        self.session.contexts.reset();
        Ok(())
    }

    /// ``Then page title $rule `$title` ``
    pub async fn page_title_is(&mut self, rule: StringComparisonRule, title: &str) -> Result<bool> {
        let expected = self.context.resolve(title);
        let actual = self.session.browser.title().await?;
        Ok(self
            .context
            .soft_assert()
            .assert_string("Page title", &actual, rule, &expected))
    }

    /// ``Then page URL $rule `$url` ``
    pub async fn page_url_is(&mut self, rule: StringComparisonRule, url: &str) -> Result<bool> {
        let expected = self.context.resolve(url);
        let actual = self.session.browser.current_url().await?;
        Ok(self
            .context
            .soft_assert()
            .assert_string("Page URL", &actual, rule, &expected))
    }
}
