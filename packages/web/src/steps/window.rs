use std::sync::Arc;

use stepweave_core::{wait_until, ComparisonRule, StringComparisonRule, TestContext, WaitOutcome};

use crate::error::{Result, WebError};
use crate::session::WebSession;

/// Steps on browser windows and tabs.
pub struct WindowSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> WindowSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// `When I open new tab`
    ///
    /// The new tab becomes the current window.
    pub async fn open_new_tab(&mut self) -> Result<()> {
        let handle = self.session.browser.new_tab().await?;
        tracing::info!(%handle, "opened new tab");
        self.session.browser.switch_to_window(&handle).await?;
        self.session.contexts.reset();
        Ok(())
    }

    /// ``When I switch to window with title that $rule `$title` ``
    ///
    /// Polls the open windows until one has a matching title. When none
    /// shows up in time, or probing a window fails, the previous window is
    /// made current again.
    pub async fn switch_to_window_with_title(
        &mut self,
        rule: StringComparisonRule,
        title: &str,
    ) -> Result<bool> {
        let expected = self.context.resolve(title);
        let browser = Arc::clone(&self.session.browser);
        let original = browser.current_window().await?;

        let expected_title = expected.as_str();
        let polled = wait_until(self.context.wait_spec(), move || {
            let browser = Arc::clone(&browser);
            async move {
                for handle in browser.window_handles().await? {
                    match browser.switch_to_window(&handle).await {
                        Err(WebError::NoSuchWindow(_)) => continue,
                        other => other?,
                    }
                    let title = browser.title().await?;
                    if rule.matches(&title, expected_title)? {
                        return Ok(Some((handle, title)));
                    }
                }
                Ok::<_, WebError>(None)
            }
        })
        .await;
        let outcome = match polled {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Err(restore) = self.session.browser.switch_to_window(&original).await {
                    tracing::warn!(%original, error = %restore, "could not return to original window");
                }
                return Err(e);
            }
        };

        let description = format!("Window with title that {rule} '{expected}' exists");
        match outcome {
            WaitOutcome::Satisfied((handle, title)) => {
                tracing::info!(%handle, %title, "switched to window");
                self.session.contexts.reset();
                Ok(self.context.soft_assert().assert_true(&description, true))
            }
            WaitOutcome::TimedOut { attempts } => {
                self.session.browser.switch_to_window(&original).await?;
                self.context
                    .soft_assert()
                    .record_failure(&description, format!("no such window after {attempts} attempt(s)"));
                Ok(false)
            }
        }
    }

    /// `When I close current window`
    ///
    /// Focus moves to the first remaining window.
    pub async fn close_current_window(&mut self) -> Result<()> {
        let browser = &self.session.browser;
        let closed = browser.current_window().await?;
        browser.close_window().await?;
        tracing::info!(handle = %closed, "closed window");
        if let Some(next) = browser.window_handles().await?.first() {
            browser.switch_to_window(next).await?;
        }
        self.session.contexts.reset();
        Ok(())
    }

    /// ``Then number of opened windows is $rule `$n` ``
    pub async fn number_of_windows(&mut self, rule: ComparisonRule, n: usize) -> Result<bool> {
        let count = self.session.browser.window_handles().await?.len();
        Ok(self
            .context
            .soft_assert()
            .assert_comparison("Number of opened windows", &count, rule, &n))
    }
}
