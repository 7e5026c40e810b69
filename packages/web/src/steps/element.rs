use std::collections::BTreeSet;

use stepweave_core::{ComparisonRule, StringComparisonRule, TestContext, VariableScope};
use strum::{Display, EnumString, VariantNames};

use super::{find_element, parse_keyword, parse_locator, with_element};
use crate::browser::{Browser, ElementHandle, ScriptArg};
use crate::error::Result;
use crate::locator::{Locator, Visibility};
use crate::search::BaseValidations;
use crate::session::WebSession;

const HOVER_SCRIPT: &str = "const el = arguments[0];\
for (const type of ['mouseover', 'mouseenter', 'mousemove']) {\
el.dispatchEvent(new MouseEvent(type, {bubbles: type !== 'mouseenter', cancelable: true, view: window}));\
}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ElementState {
    Enabled,
    Disabled,
    Selected,
    NotSelected,
    Visible,
    NotVisible,
}

impl ElementState {
    pub fn parse(text: &str) -> Result<Self> {
        parse_keyword("element state", text)
    }

    fn is_visibility(self) -> bool {
        matches!(self, Self::Visible | Self::NotVisible)
    }

    async fn holds(self, browser: &dyn Browser, element: &ElementHandle) -> Result<bool> {
        Ok(match self {
            Self::Enabled => browser.is_enabled(element).await?,
            Self::Disabled => !browser.is_enabled(element).await?,
            Self::Selected => browser.is_selected(element).await?,
            Self::NotSelected => !browser.is_selected(element).await?,
            Self::Visible => browser.is_displayed(element).await?,
            Self::NotVisible => !browser.is_displayed(element).await?,
        })
    }
}

/// Interaction with and assertions on single elements.
pub struct ElementSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> ElementSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I click on element located by `$locator` ``
    pub async fn click(&mut self, locator: &str) -> Result<()> {
        let locator = parse_locator(self.context, locator)?;
        tracing::info!(%locator, "clicking element");
        with_element(self.session, self.context, &locator, |browser, element| async move {
            browser.click(&element).await
        })
        .await?;
        Ok(())
    }

    /// ``When I hover mouse over element located by `$locator` ``
    pub async fn hover(&mut self, locator: &str) -> Result<()> {
        let locator = parse_locator(self.context, locator)?;
        let Some(element) = find_element(self.session, self.context, &locator).await? else {
            return Ok(());
        };
        tracing::info!(%locator, "hovering over element");
        self.session
            .browser
            .execute_script(HOVER_SCRIPT, vec![ScriptArg::Element(element)])
            .await?;
        Ok(())
    }

    /// ``When I enter `$text` in field located by `$locator` ``
    ///
    /// Replaces the current field content.
    pub async fn enter_text(&mut self, text: &str, locator: &str) -> Result<()> {
        let text = self.context.resolve(text);
        let locator = parse_locator(self.context, locator)?;
        tracing::info!(%locator, "entering text");
        let text = text.as_str();
        with_element(self.session, self.context, &locator, move |browser, element| async move {
            browser.clear(&element).await?;
            browser.send_keys(&element, text).await
        })
        .await?;
        Ok(())
    }

    /// ``When I add `$text` to field located by `$locator` ``
    pub async fn add_text(&mut self, text: &str, locator: &str) -> Result<()> {
        let text = self.context.resolve(text);
        let locator = parse_locator(self.context, locator)?;
        tracing::info!(%locator, "adding text");
        let text = text.as_str();
        with_element(self.session, self.context, &locator, move |browser, element| async move {
            browser.send_keys(&element, text).await
        })
        .await?;
        Ok(())
    }

    /// ``When I clear field located by `$locator` ``
    pub async fn clear_field(&mut self, locator: &str) -> Result<()> {
        let locator = parse_locator(self.context, locator)?;
        tracing::info!(%locator, "clearing field");
        with_element(self.session, self.context, &locator, |browser, element| async move {
            browser.clear(&element).await
        })
        .await?;
        Ok(())
    }

    /// ``Then text of element located by `$locator` $rule `$text` ``
    pub async fn text_is(
        &mut self,
        locator: &str,
        rule: StringComparisonRule,
        text: &str,
    ) -> Result<bool> {
        let expected = self.context.resolve(text);
        let locator = parse_locator(self.context, locator)?;
        let Some(actual) = self.read_text(&locator).await? else {
            return Ok(false);
        };
        Ok(self.context.soft_assert().assert_string(
            &format!("Text of element located by {locator}"),
            &actual,
            rule,
            &expected,
        ))
    }

    /// ``Then element located by `$locator` has attribute `$name` with value $rule `$value` ``
    pub async fn attribute_is(
        &mut self,
        locator: &str,
        name: &str,
        rule: StringComparisonRule,
        value: &str,
    ) -> Result<bool> {
        let name = self.context.resolve(name);
        let expected = self.context.resolve(value);
        let locator = parse_locator(self.context, locator)?;
        let description = format!("Attribute '{name}' of element located by {locator}");
        let Some(actual) = self.read_attribute(&locator, &name, &description).await? else {
            return Ok(false);
        };
        Ok(self
            .context
            .soft_assert()
            .assert_string(&description, &actual, rule, &expected))
    }

    /// ``Then element located by `$locator` is $state``
    ///
    /// `VISIBLE` and `NOT_VISIBLE` look at visible and invisible elements alike.
    pub async fn element_state_is(&mut self, locator: &str, state: ElementState) -> Result<bool> {
        let mut locator = parse_locator(self.context, locator)?;
        if state.is_visibility() {
            locator.visibility = Visibility::All;
        }
        let holds = with_element(self.session, self.context, &locator, move |browser, element| {
            async move { state.holds(browser.as_ref(), &element).await }
        })
        .await?;
        let Some(holds) = holds else {
            return Ok(false);
        };
        Ok(self
            .context
            .soft_assert()
            .assert_true(&format!("Element located by {locator} is {state}"), holds))
    }

    /// ``Then number of elements found by `$locator` is $rule `$n` ``
    pub async fn number_of_elements(
        &mut self,
        locator: &str,
        rule: ComparisonRule,
        n: usize,
    ) -> Result<bool> {
        let locator = parse_locator(self.context, locator)?;
        let description = format!("Number of elements found by {locator}");
        BaseValidations::new(self.session.search(), self.context.soft_assert())
            .assert_elements_number(&description, &locator, rule, n)
            .await
    }

    /// ``Then element located by `$locator` does not exist``
    pub async fn element_does_not_exist(&mut self, locator: &str) -> Result<bool> {
        let locator = parse_locator(self.context, locator)?;
        let description = format!("Element located by {locator} does not exist");
        BaseValidations::new(self.session.search(), self.context.soft_assert())
            .assert_element_does_not_exist(&description, &locator)
            .await
    }

    /// ``When I save text of element located by `$locator` to $scopes variable `$var` ``
    pub async fn save_text(
        &mut self,
        locator: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let variable = self.context.resolve(variable);
        let locator = parse_locator(self.context, locator)?;
        if let Some(text) = self.read_text(&locator).await? {
            self.context.variables_mut().put_string(scopes, &variable, text)?;
        }
        Ok(())
    }

    /// ``When I save attribute `$name` value of element located by `$locator` to $scopes variable `$var` ``
    pub async fn save_attribute(
        &mut self,
        name: &str,
        locator: &str,
        scopes: &BTreeSet<VariableScope>,
        variable: &str,
    ) -> Result<()> {
        let name = self.context.resolve(name);
        let variable = self.context.resolve(variable);
        let locator = parse_locator(self.context, locator)?;
        let description = format!("Attribute '{name}' of element located by {locator}");
        if let Some(value) = self.read_attribute(&locator, &name, &description).await? {
            self.context.variables_mut().put_string(scopes, &variable, value)?;
        }
        Ok(())
    }

    async fn read_text(&mut self, locator: &Locator) -> Result<Option<String>> {
        with_element(self.session, self.context, locator, |browser, element| async move {
            browser.text(&element).await
        })
        .await
    }

    /// Attribute value; a missing attribute is recorded under `description`.
    async fn read_attribute(
        &mut self,
        locator: &Locator,
        name: &str,
        description: &str,
    ) -> Result<Option<String>> {
        let value = with_element(self.session, self.context, locator, move |browser, element| {
            async move { browser.attribute(&element, name).await }
        })
        .await?;
        match value {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                self.context
                    .soft_assert()
                    .record_failure(description, "attribute is not present");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
