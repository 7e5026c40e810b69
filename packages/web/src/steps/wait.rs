use stepweave_core::{parse_duration, wait_until, TestContext, WaitOutcome, WaitSpec};

use super::parse_locator;
use crate::error::{Result, WebError};
use crate::locator::Locator;
use crate::session::WebSession;

/// Steps that wait for elements in the current search context.
///
/// A wait that times out is recorded as a soft failure.
pub struct WaitSteps<'a> {
    session: &'a mut WebSession,
    context: &'a mut TestContext,
}

impl<'a> WaitSteps<'a> {
    pub fn new(session: &'a mut WebSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// ``When I wait until element located by `$locator` appears``
    pub async fn wait_until_appears(&mut self, locator: &str) -> Result<bool> {
        let locator = parse_locator(self.context, locator)?;
        let spec = self.context.wait_spec();
        self.wait_for(&locator, spec, true).await
    }

    /// ``When I wait until element located by `$locator` disappears``
    pub async fn wait_until_disappears(&mut self, locator: &str) -> Result<bool> {
        let locator = parse_locator(self.context, locator)?;
        let spec = self.context.wait_spec();
        self.wait_for(&locator, spec, false).await
    }

    /// ``When I wait `$duration` until element located by `$locator` appears``
    pub async fn wait_duration_until_appears(&mut self, duration: &str, locator: &str) -> Result<bool> {
        let timeout = parse_duration(&self.context.resolve(duration))?;
        let locator = parse_locator(self.context, locator)?;
        let spec = self.context.wait_spec().with_timeout(timeout);
        self.wait_for(&locator, spec, true).await
    }

    async fn wait_for(&mut self, locator: &Locator, spec: WaitSpec, present: bool) -> Result<bool> {
        let search = self.session.search();
        tracing::info!(%locator, timeout = ?spec.timeout, present, "waiting for element");
        let outcome = wait_until(spec, || async move {
            let found = search.find(locator).await?;
            Ok::<_, WebError>((found.is_empty() != present).then_some(found.len()))
        })
        .await?;

        let verb = if present { "appears" } else { "disappears" };
        let description = format!("Element located by {locator} {verb}");
        Ok(match outcome {
            WaitOutcome::Satisfied(_) => self.context.soft_assert().assert_true(&description, true),
            WaitOutcome::TimedOut { attempts } => {
                self.context.soft_assert().record_failure(
                    &description,
                    format!("timed out after {:?} ({attempts} attempts)", spec.timeout),
                );
                false
            }
        })
    }
}
