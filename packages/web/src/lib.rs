//! Stepweave Web
//!
//! Browser steps for BDD scenarios:
//! - [`locator`]: locator syntax and its lowering to native searches
//! - [`browser`]: the browser seam the steps are written against
//! - [`driver`]: [`Browser`] over a WebDriver session (`fantoccini`)
//! - [`context`]: search-context stack of elements and frames
//! - [`search`]: element search with visibility and filters, and validations
//! - [`steps`]: step services bound to step phrases
//!
//! # Example
//!
//! ```no_run
//! use stepweave_core::{StringComparisonRule, TestContext};
//! use stepweave_web::steps::{ElementSteps, NavigationSteps};
//! use stepweave_web::{WebConfig, WebSession};
//!
//! # async fn run() -> stepweave_web::Result<()> {
//! let config = WebConfig::new().with_base_url("http://localhost:3000")?;
//! let mut session = WebSession::connect(config).await?;
//! let mut context = TestContext::default();
//!
//! NavigationSteps::new(&mut session, &mut context).open_page("/login").await?;
//! let mut elements = ElementSteps::new(&mut session, &mut context);
//! elements.enter_text("ann", "id(username)").await?;
//! elements.click("cssSelector(button[type=submit])").await?;
//! NavigationSteps::new(&mut session, &mut context)
//!     .page_title_is(StringComparisonRule::Contains, "Dashboard")
//!     .await?;
//!
//! session.finish_scenario().await?;
//! context.finish_scenario()?;
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod locator;
pub mod search;
pub mod session;
pub mod steps;

pub use browser::{Browser, BrowserCookie, By, ElementHandle, ScriptArg};
pub use config::{BrowserKind, WebConfig};
pub use context::{SearchContext, SearchContextStack};
pub use driver::WebDriverBrowser;
pub use error::{Result, WebError};
pub use locator::{Locator, LocatorFilter, SearchStrategy, Visibility};
pub use search::{BaseValidations, ElementSearch};
pub use session::WebSession;
