//! Element search and the validations built on it.

use stepweave_core::{ComparisonRule, SoftAssert};

use crate::browser::{Browser, ElementHandle};
use crate::error::Result;
use crate::locator::{Locator, LocatorFilter, Visibility};

/// Resolves locators below a search root.
#[derive(Clone, Copy)]
pub struct ElementSearch<'a> {
    browser: &'a dyn Browser,
    root: Option<&'a ElementHandle>,
}

impl<'a> ElementSearch<'a> {
    pub fn new(browser: &'a dyn Browser, root: Option<&'a ElementHandle>) -> Self {
        Self { browser, root }
    }

    /// Elements matching `locator`, in document order.
    ///
    /// Elements that go stale while their visibility or filters are checked
    /// are left out.
    pub async fn find(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let candidates = self
            .browser
            .find_elements(self.root, &locator.to_search())
            .await?;

        let mut found = Vec::with_capacity(candidates.len());
        for element in candidates {
            match self.accepts(locator, &element).await {
                Ok(true) => found.push(element),
                Ok(false) => {}
                Err(e) if e.is_stale() => {
                    tracing::debug!(%element, %locator, "skipping stale element");
                }
                Err(e) => return Err(e),
            }
        }
        tracing::debug!(%locator, count = found.len(), "element search finished");
        Ok(found)
    }

    async fn accepts(&self, locator: &Locator, element: &ElementHandle) -> Result<bool> {
        let visible = match locator.visibility {
            Visibility::All => true,
            Visibility::Visible => self.browser.is_displayed(element).await?,
            Visibility::Invisible => !self.browser.is_displayed(element).await?,
        };
        if !visible {
            return Ok(false);
        }

        for filter in &locator.filters {
            let accepted = match filter {
                LocatorFilter::Text(text) => self.browser.text(element).await?.trim() == text.trim(),
                LocatorFilter::TextPart(part) => self.browser.text(element).await?.contains(part.as_str()),
                LocatorFilter::Attribute { name, value } => {
                    let actual = self.browser.attribute(element, name).await?;
                    match (actual, value) {
                        (Some(actual), Some(expected)) => actual == *expected,
                        (Some(_), None) => true,
                        (None, _) => false,
                    }
                }
            };
            if !accepted {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Element assertions recorded as soft assertions.
pub struct BaseValidations<'a> {
    search: ElementSearch<'a>,
    soft_assert: &'a mut SoftAssert,
}

impl<'a> BaseValidations<'a> {
    pub fn new(search: ElementSearch<'a>, soft_assert: &'a mut SoftAssert) -> Self {
        Self {
            search,
            soft_assert,
        }
    }

    /// Exactly one element must match. Returns it when it does.
    pub async fn assert_element_exists(
        &mut self,
        description: &str,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>> {
        let mut found = self.search.find(locator).await?;
        match found.len() {
            1 => {
                self.soft_assert.assert_true(description, true);
                Ok(found.pop())
            }
            0 => {
                self.soft_assert
                    .record_failure(description, format!("no element found by {locator}"));
                Ok(None)
            }
            count => {
                self.soft_assert.record_failure(
                    description,
                    format!("expected exactly one element by {locator}, found {count}"),
                );
                Ok(None)
            }
        }
    }

    pub async fn assert_elements_number(
        &mut self,
        description: &str,
        locator: &Locator,
        rule: ComparisonRule,
        expected: usize,
    ) -> Result<bool> {
        let found = self.search.find(locator).await?;
        Ok(self
            .soft_assert
            .assert_comparison(description, &found.len(), rule, &expected))
    }

    pub async fn assert_element_does_not_exist(
        &mut self,
        description: &str,
        locator: &Locator,
    ) -> Result<bool> {
        let found = self.search.find(locator).await?;
        if found.is_empty() {
            return Ok(self.soft_assert.assert_true(description, true));
        }
        self.soft_assert.record_failure(
            description,
            format!("found {} element(s) by {locator}", found.len()),
        );
        Ok(false)
    }
}
