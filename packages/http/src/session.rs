//! Per-scenario HTTP state shared by the HTTP steps.

use crate::client::{HttpClient, HttpMethod};
use crate::config::HttpConfig;
use crate::cookies::CookieStore;
use crate::error::Result;
use crate::request::HttpRequestScratch;
use crate::response::ResponseHolder;

pub struct HttpSession {
    pub client: HttpClient,
    pub scratch: HttpRequestScratch,
    pub cookies: CookieStore,
    pub responses: ResponseHolder,
}

impl HttpSession {
    pub fn new(config: HttpConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            scratch: HttpRequestScratch::new(),
            cookies: CookieStore::new(),
            responses: ResponseHolder::new(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(HttpConfig::from_env()?)
    }

    /// Send the pending request and keep its response as the last one.
    pub async fn execute(&mut self, method: HttpMethod, url: &str) -> Result<()> {
        let response = self
            .client
            .execute(method, url, &mut self.scratch, &mut self.cookies)
            .await?;
        self.responses.set(response);
        Ok(())
    }

    pub fn finish_scenario(&mut self) {
        self.scratch.release();
        self.cookies.clear();
        self.responses.clear();
    }
}
