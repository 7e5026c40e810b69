//! Pending request data collected by steps before the request is sent.
//!
//! Headers and body set by `Given`/`When` steps accumulate here until the
//! next HTTP call, which consumes them and calls [`HttpRequestScratch::release`].

use std::time::Duration;

/// Content type of url-encoded form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl MultipartPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            content: value.into().into_bytes(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Text {
        content: String,
        content_type: Option<String>,
    },
    /// Url-encoded form fields.
    Form(Vec<(String, String)>),
    Multipart(Vec<MultipartPart>),
    Binary {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
}

/// Body bytes ready to send, with the content type they imply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl RequestBody {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            content_type: None,
        }
    }

    /// Render the body. Multipart bodies get a fresh random boundary.
    pub fn render(&self) -> RenderedBody {
        match self {
            Self::Text {
                content,
                content_type,
            } => RenderedBody {
                bytes: content.clone().into_bytes(),
                content_type: content_type.clone(),
            },
            Self::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .finish();
                RenderedBody {
                    bytes: encoded.into_bytes(),
                    content_type: Some(FORM_CONTENT_TYPE.to_string()),
                }
            }
            Self::Multipart(parts) => {
                let boundary = format!("stepweave-{}", uuid::Uuid::new_v4().simple());
                render_multipart(parts, &boundary)
            }
            Self::Binary {
                bytes,
                content_type,
            } => RenderedBody {
                bytes: bytes.clone(),
                content_type: content_type.clone(),
            },
        }
    }
}

/// Render multipart parts with CRLF line endings around `boundary`.
pub fn render_multipart(parts: &[MultipartPart], boundary: &str) -> RenderedBody {
    let mut bytes = Vec::new();
    for part in parts {
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = &part.file_name {
            disposition.push_str(&format!("; filename=\"{file_name}\""));
        }
        bytes.extend_from_slice(disposition.as_bytes());
        bytes.extend_from_slice(b"\r\n");
        if let Some(content_type) = &part.content_type {
            bytes.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(&part.content);
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    RenderedBody {
        bytes,
        content_type: Some(format!("multipart/form-data; boundary={boundary}")),
    }
}

/// Request data pending until the next HTTP call.
#[derive(Debug, Default)]
pub struct HttpRequestScratch {
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
}

impl HttpRequestScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Replace all pending headers.
    pub fn set_headers(&mut self, headers: Vec<(String, String)>) {
        self.headers = headers;
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    pub fn set_body(&mut self, body: RequestBody) {
        self.body = Some(body);
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drop everything collected for the request just sent.
    pub fn release(&mut self) {
        self.headers.clear();
        self.body = None;
        self.timeout = None;
    }
}
