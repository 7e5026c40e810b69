//! Web step services.
//!
//! Each service borrows the scenario's [`WebSession`](crate::WebSession)
//! and [`TestContext`](stepweave_core::TestContext) for one step, like the
//! HTTP step services. Locator arguments are resolved for `${var}`
//! placeholders before parsing.

mod context;
mod cookies;
mod element;
mod js;
mod navigation;
mod scroll;
mod wait;
mod window;

pub use context::ContextSteps;
pub use cookies::WebCookieSteps;
pub use element::{ElementState, ElementSteps};
pub use js::{JavascriptSteps, ScriptArgType};
pub use navigation::NavigationSteps;
pub use scroll::{ScrollEdge, ScrollSteps};
pub use wait::WaitSteps;
pub use window::WindowSteps;

use std::future::Future;
use std::sync::Arc;

use strum::VariantNames;

use stepweave_core::TestContext;

use crate::browser::{Browser, ElementHandle};
use crate::error::{Result, WebError};
use crate::locator::Locator;
use crate::search::BaseValidations;
use crate::session::WebSession;

fn parse_locator(context: &TestContext, raw: &str) -> Result<Locator> {
    Locator::parse(&context.resolve(raw))
}

/// Parse an upper-case step keyword such as `NOT_VISIBLE` or `not visible`.
fn parse_keyword<T>(kind: &'static str, text: &str) -> Result<T>
where
    T: std::str::FromStr + VariantNames,
{
    let normalized = text.trim().replace([' ', '-'], "_");
    normalized.parse().map_err(|_| WebError::UnknownKeyword {
        kind,
        value: text.trim().to_string(),
        expected: T::VARIANTS.join(", "),
    })
}

/// The single element located by `locator`, or a soft failure.
async fn find_element(
    session: &WebSession,
    context: &mut TestContext,
    locator: &Locator,
) -> Result<Option<ElementHandle>> {
    let description = format!("Element located by {locator} exists");
    BaseValidations::new(session.search(), context.soft_assert())
        .assert_element_exists(&description, locator)
        .await
}

/// Locate the element and run `action` on it.
///
/// When the element goes stale in between, it is located again and the
/// action retried once.
async fn with_element<T, F, Fut>(
    session: &WebSession,
    context: &mut TestContext,
    locator: &Locator,
    mut action: F,
) -> Result<Option<T>>
where
    F: FnMut(Arc<dyn Browser>, ElementHandle) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retried = false;
    loop {
        let Some(element) = find_element(session, context, locator).await? else {
            return Ok(None);
        };
        match action(Arc::clone(&session.browser), element).await {
            Err(e) if e.is_stale() && !retried => {
                tracing::debug!(%locator, "element went stale, locating it again");
                retried = true;
            }
            outcome => return outcome.map(Some),
        }
    }
}
