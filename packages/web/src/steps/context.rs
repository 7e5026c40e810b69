use stepweave_core::TestContext;

use super::{find_element, parse_locator};
use crate::error::Result;
use crate::session::WebSession;

/// Steps that move the search context between elements and frames.
pub struct ContextSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> ContextSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I change context to element located by `$locator` ``
    ///
    /// The element is searched from the page (or frame) root.
    pub async fn change_context(&mut self, locator: &str) -> Result<()> {
        self.session.contexts.reset_elements();
        self.change_context_in_current_scope(locator).await
    }

    /// ``When I change context to element located by `$locator` in scope of current context``
    pub async fn change_context_in_current_scope(&mut self, locator: &str) -> Result<()> {
        let locator = parse_locator(self.context, locator)?;
        if let Some(element) = find_element(self.session, self.context, &locator).await? {
            tracing::info!(%locator, "changing context to element");
            self.session.contexts.push_element(element);
        }
        Ok(())
    }

    /// `When I reset context`
    pub fn reset_context(&mut self) {
        tracing::info!("resetting search context");
        self.session.contexts.reset_elements();
    }

    /// ``When I switch to frame located by `$locator` ``
    pub async fn switch_to_frame(&mut self, locator: &str) -> Result<()> {
        let locator = parse_locator(self.context, locator)?;
        let Some(frame) = find_element(self.session, self.context, &locator).await? else {
            return Ok(());
        };
        tracing::info!(%locator, "switching to frame");
        self.session.browser.switch_to_frame(&frame).await?;
        self.session.contexts.enter_frame(frame);
        Ok(())
    }

    /// `When I switch to parent frame`
    pub async fn switch_to_parent_frame(&mut self) -> Result<()> {
        self.session.browser.switch_to_parent_frame().await?;
        if !self.session.contexts.leave_frame() {
            tracing::debug!("already at top-level page");
        }
        Ok(())
    }

    /// `When I switch to default content`
    pub async fn switch_to_default_content(&mut self) -> Result<()> {
        self.session.browser.switch_to_default_content().await?;
        self.session.contexts.reset();
        Ok(())
    }
}
