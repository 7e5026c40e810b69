//! HTTP step services.
//!
//! Each service borrows the scenario's [`HttpSession`](crate::HttpSession)
//! and [`TestContext`](stepweave_core::TestContext) for the duration of one
//! step. The doc comment of every step method carries the step phrase it
//! implements; BDD glue binds the phrase and forwards the captured arguments.

mod cookies;
mod json;
mod request;
mod response;

pub use cookies::HttpCookieSteps;
pub use json::JsonSteps;
pub use request::HttpRequestSteps;
pub use response::HttpResponseSteps;

use stepweave_core::SoftAssert;

use crate::response::{HttpResponse, ResponseHolder};

/// Failure details recorded when a step needs a response and none exists.
pub const NO_RESPONSE: &str = "No HTTP response received";

/// Last response, or a soft failure under `description` when there is none.
fn require_response<'r>(
    responses: &'r ResponseHolder,
    soft_assert: &mut SoftAssert,
    description: &str,
) -> Option<&'r HttpResponse> {
    let response = responses.last();
    if response.is_none() {
        soft_assert.record_failure(description, NO_RESPONSE);
    }
    response
}
