//! Stepweave HTTP
//!
//! HTTP steps for BDD scenarios:
//! - [`request`]: headers, body and timeout pending until the next call
//! - [`client`]: request execution with retries, wrapping `reqwest`
//! - [`response`]: last response and the JSON cursor over its body
//! - [`json_path`]: JSON path evaluation
//! - [`cookies`]: cookies collected from responses
//! - [`curl`]: cURL command reconstruction of executed requests
//! - [`steps`]: step services bound to step phrases
//!
//! # Example
//!
//! ```no_run
//! use stepweave_core::{ComparisonRule, TestContext};
//! use stepweave_http::steps::{HttpRequestSteps, HttpResponseSteps};
//! use stepweave_http::{HttpConfig, HttpSession};
//!
//! # async fn run() -> stepweave_http::Result<()> {
//! let mut session = HttpSession::new(HttpConfig::new().with_base_url("http://localhost:8080")?)?;
//! let mut context = TestContext::default();
//!
//! HttpRequestSteps::new(&mut session, &mut context)
//!     .execute_request("GET", "/health")
//!     .await?;
//! HttpResponseSteps::new(&mut session, &mut context)
//!     .response_code_is(ComparisonRule::EqualTo, 200);
//! context.finish_scenario()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod cookies;
pub mod curl;
pub mod error;
pub mod json_path;
pub mod request;
pub mod response;
pub mod session;
pub mod steps;

pub use client::{HttpClient, HttpMethod};
pub use config::HttpConfig;
pub use cookies::{CookieStore, HttpCookie};
pub use curl::{to_curl, CapturedRequest};
pub use error::{HttpError, Result};
pub use request::{HttpRequestScratch, MultipartPart, RequestBody};
pub use response::{HttpResponse, ResponseHolder};
pub use session::HttpSession;
