//! HTTP client wrapper executing requests built by steps.

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method};
use strum::{Display, EnumString};
use tokio::time::Instant;

use crate::config::{HttpConfig, MAX_RETRY_DELAY, USER_AGENT};
use crate::cookies::CookieStore;
use crate::curl::CapturedRequest;
use crate::error::{HttpError, Result};
use crate::request::{HttpRequestScratch, RequestBody};
use crate::response::HttpResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_str(text.trim()).map_err(|_| HttpError::InvalidMethod(text.to_string()))
    }

    /// Methods that are safe to send again after a transient failure.
    pub fn is_idempotent(self) -> bool {
        matches!(
            self,
            Self::Get | Self::Head | Self::Options | Self::Put | Self::Delete
        )
    }

    fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
            Self::Head => Method::HEAD,
            Self::Options => Method::OPTIONS,
            Self::Trace => Method::TRACE,
        }
    }
}

/// Delay before retry number `attempt` (1-based): base, 2x base, 4x base,
/// capped at [`MAX_RETRY_DELAY`].
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

pub struct HttpClient {
    http: Client,
    config: HttpConfig,
    last_request: Option<CapturedRequest>,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            config,
            last_request: None,
        })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// The request sent by the last [`execute`](Self::execute) call.
    pub fn last_request(&self) -> Option<&CapturedRequest> {
        self.last_request.as_ref()
    }

    /// Send a request built from `scratch`.
    ///
    /// The scratch is released afterwards whether or not the call succeeded.
    /// Cookies from the response are stored in `cookies`.
    pub async fn execute(
        &mut self,
        method: HttpMethod,
        url: &str,
        scratch: &mut HttpRequestScratch,
        cookies: &mut CookieStore,
    ) -> Result<HttpResponse> {
        let result = self.send(method, url, scratch, cookies).await;
        scratch.release();
        result
    }

    async fn send(
        &mut self,
        method: HttpMethod,
        raw_url: &str,
        scratch: &HttpRequestScratch,
        cookies: &mut CookieStore,
    ) -> Result<HttpResponse> {
        let url = self.config.resolve_url(raw_url)?;
        let rendered = scratch.body().map(RequestBody::render);
        let is_multipart = matches!(scratch.body(), Some(RequestBody::Multipart(_)));

        let mut headers: Vec<(String, String)> = scratch
            .headers()
            .iter()
            .filter(|(name, _)| !(is_multipart && name.eq_ignore_ascii_case("Content-Type")))
            .cloned()
            .collect();
        if let Some(content_type) = rendered.as_ref().and_then(|b| b.content_type.clone()) {
            if is_multipart || !scratch.has_header("Content-Type") {
                headers.push(("Content-Type".to_string(), content_type));
            }
        }
        if let Some(cookie) = cookies.cookie_header(&url) {
            if !scratch.has_header("Cookie") {
                headers.push(("Cookie".to_string(), cookie));
            }
        }

        let mut header_map = reqwest::header::HeaderMap::new();
        for (name, value) in &headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| HttpError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            header_map.append(header_name, header_value);
        }

        let captured = CapturedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers,
            body: rendered.map(|b| b.bytes),
        };
        tracing::debug!(curl = %captured.to_curl(), "executing HTTP request");
        self.last_request = Some(captured.clone());

        let retries = if method.is_idempotent() {
            self.config.max_retries
        } else {
            0
        };
        let max_attempts = retries.saturating_add(1);
        let mut last_error: Option<String> = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = backoff_delay(self.config.retry_base_delay, attempt);
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
                tokio::time::sleep(delay).await;
            }

            let mut request = self
                .http
                .request(method.as_reqwest(), url.clone())
                .headers(header_map.clone());
            if let Some(body) = &captured.body {
                request = request.body(body.clone());
            }
            if let Some(timeout) = scratch.timeout() {
                request = request.timeout(timeout);
            }

            let started = Instant::now();
            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() && attempt + 1 < max_attempts {
                        tracing::warn!(
                            status = %status,
                            attempt = attempt + 1,
                            max_attempts,
                            "Server error, will retry"
                        );
                        continue;
                    }

                    let final_url = response.url().to_string();
                    let response_headers: Vec<(String, String)> = response
                        .headers()
                        .iter()
                        .map(|(name, value)| {
                            (
                                name.to_string(),
                                String::from_utf8_lossy(value.as_bytes()).into_owned(),
                            )
                        })
                        .collect();
                    let body = response.bytes().await?.to_vec();
                    let response_time = started.elapsed();

                    for (name, value) in &response_headers {
                        if name.eq_ignore_ascii_case("Set-Cookie") {
                            cookies.store_set_cookie(&url, value);
                        }
                    }

                    tracing::info!(
                        method = %method,
                        url = %final_url,
                        status = status.as_u16(),
                        response_time_ms = response_time.as_millis() as u64,
                        "HTTP response received"
                    );

                    return Ok(HttpResponse {
                        method: method.to_string(),
                        url: final_url,
                        status: status.as_u16(),
                        headers: response_headers,
                        body,
                        response_time,
                    });
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    if attempt + 1 < max_attempts {
                        tracing::warn!(
                            error = %e,
                            attempt = attempt + 1,
                            max_attempts,
                            "Connection error, will retry"
                        );
                        last_error = Some(e.to_string());
                        continue;
                    }
                    if attempt == 0 {
                        return Err(HttpError::Request(e));
                    }
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(HttpError::Request(e)),
            }
        }

        Err(HttpError::RetriesExhausted {
            attempts: max_attempts,
            message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
        })
    }
}

/// Response time in whole milliseconds, for comparisons in steps.
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
