use serde_json::Value;
use stepweave_core::TestContext;
use strum::{Display, EnumString, VariantNames};

use super::{find_element, parse_keyword, parse_locator};
use crate::browser::ScriptArg;
use crate::error::Result;
use crate::session::WebSession;

const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView({block: 'start', inline: 'nearest'});";

const IS_SCROLLED_TO_SCRIPT: &str = "const rect = arguments[0].getBoundingClientRect();\
return rect.top >= 0 && rect.top < window.innerHeight;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ScrollEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl ScrollEdge {
    pub fn parse(text: &str) -> Result<Self> {
        parse_keyword("scroll edge", text)
    }

    /// Script scrolling `arguments[0]`, or the page when `element` is false.
    fn script(self, element: bool) -> &'static str {
        match (self, element) {
            (Self::Top, true) => "arguments[0].scrollTop = 0;",
            (Self::Bottom, true) => "arguments[0].scrollTop = arguments[0].scrollHeight;",
            (Self::Left, true) => "arguments[0].scrollLeft = 0;",
            (Self::Right, true) => "arguments[0].scrollLeft = arguments[0].scrollWidth;",
            (Self::Top, false) => "window.scrollTo(window.scrollX, 0);",
            (Self::Bottom, false) => {
                "window.scrollTo(window.scrollX, document.documentElement.scrollHeight);"
            }
            (Self::Left, false) => "window.scrollTo(0, window.scrollY);",
            (Self::Right, false) => {
                "window.scrollTo(document.documentElement.scrollWidth, window.scrollY);"
            }
        }
    }
}

/// Scrolling the page, the search context or elements.
pub struct ScrollSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> ScrollSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I scroll element located by `$locator` into view``
    pub async fn scroll_into_view(&mut self, locator: &str) -> Result<()> {
        let locator = parse_locator(self.context, locator)?;
        let Some(element) = find_element(self.session, self.context, &locator).await? else {
            return Ok(());
        };
        tracing::info!(%locator, "scrolling element into view");
        self.session
            .browser
            .execute_script(SCROLL_INTO_VIEW_SCRIPT, vec![ScriptArg::Element(element)])
            .await?;
        Ok(())
    }

    /// `When I scroll context to $edge edge`
    ///
    /// Scrolls the current context element, or the page when the context is
    /// the page or a frame.
    pub async fn scroll_context_to_edge(&mut self, edge: ScrollEdge) -> Result<()> {
        let root = self.session.contexts.current_root().cloned();
        tracing::info!(%edge, element = root.is_some(), "scrolling context");
        let script = edge.script(root.is_some());
        let args = root.map(ScriptArg::Element).into_iter().collect();
        self.session.browser.execute_script(script, args).await?;
        Ok(())
    }

    /// ``Then page is scrolled to element located by `$locator` ``
    pub async fn page_is_scrolled_to_element(&mut self, locator: &str) -> Result<bool> {
        let locator = parse_locator(self.context, locator)?;
        let Some(element) = find_element(self.session, self.context, &locator).await? else {
            return Ok(false);
        };
        let scrolled = self
            .session
            .browser
            .execute_script(IS_SCROLLED_TO_SCRIPT, vec![ScriptArg::Element(element)])
            .await?;
        Ok(self.context.soft_assert().assert_true(
            &format!("Page is scrolled to element located by {locator}"),
            scrolled == Value::Bool(true),
        ))
    }
}
