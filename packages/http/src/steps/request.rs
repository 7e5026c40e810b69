use stepweave_core::{parse_duration, Table, TestContext};

use crate::client::HttpMethod;
use crate::error::{HttpError, Result};
use crate::request::{MultipartPart, RequestBody};
use crate::session::HttpSession;

/// Steps that build and send HTTP requests.
pub struct HttpRequestSteps<'a> {
    session: &'a mut HttpSession,
    context: &'a mut TestContext,
}

impl<'a> HttpRequestSteps<'a> {
    pub fn new(session: &'a mut HttpSession, context: &'a mut TestContext) -> Self {
        Self { session, context }
    }

    /// `Given request body: $content`
    pub fn request_body(&mut self, content: &str) {
        let content = self.context.resolve(content);
        tracing::info!(length = content.len(), "setting request body");
        self.session.scratch.set_body(RequestBody::text(content));
    }

    /// `When I set request headers: $headers`
    ///
    /// Replaces every pending header. The table has `name` and `value` columns.
    pub fn set_request_headers(&mut self, headers: &Table) -> Result<()> {
        let headers = self.header_rows(headers)?;
        tracing::info!(count = headers.len(), "setting request headers");
        self.session.scratch.set_headers(headers);
        Ok(())
    }

    /// `When I add request headers: $headers`
    pub fn add_request_headers(&mut self, headers: &Table) -> Result<()> {
        for (name, value) in self.header_rows(headers)? {
            tracing::info!(%name, "adding request header");
            self.session.scratch.add_header(name, value);
        }
        Ok(())
    }

    /// `Given form data: $table`
    pub fn form_data(&mut self, table: &Table) -> Result<()> {
        let fields = self.header_rows(table)?;
        tracing::info!(fields = fields.len(), "setting url-encoded form body");
        self.session.scratch.set_body(RequestBody::Form(fields));
        Ok(())
    }

    /// `Given multipart request: $table`
    ///
    /// Columns: `type` (`STRING` or `FILE`), `name`, `value`, and optional
    /// `contentType` and `fileName`. A `FILE` part sends `value` as the file
    /// content; its file name defaults to the part name.
    pub fn multipart_request(&mut self, table: &Table) -> Result<()> {
        let mut parts = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let kind = table.required(row, "type")?;
            let name = self.context.resolve(table.required(row, "name")?);
            let value = self.context.resolve(table.required(row, "value")?);
            let content_type = table
                .cell(row, "contentType")
                .filter(|ct| !ct.is_empty())
                .map(|ct| self.context.resolve(ct));

            let part = match kind.trim().to_ascii_uppercase().as_str() {
                "STRING" => {
                    let mut part = MultipartPart::text(name, value);
                    part.content_type = content_type;
                    part
                }
                "FILE" => {
                    let file_name = table
                        .cell(row, "fileName")
                        .filter(|f| !f.is_empty())
                        .map(|f| self.context.resolve(f))
                        .unwrap_or_else(|| name.clone());
                    MultipartPart::file(name, file_name, content_type, value.into_bytes())
                }
                _ => return Err(HttpError::InvalidPartType(kind.to_string())),
            };
            parts.push(part);
        }
        tracing::info!(parts = parts.len(), "setting multipart body");
        self.session.scratch.set_body(RequestBody::Multipart(parts));
        Ok(())
    }

    /// ``When I set HTTP request timeout to `$duration` ``
    pub fn set_request_timeout(&mut self, duration: &str) -> Result<()> {
        let timeout = parse_duration(&self.context.resolve(duration))?;
        tracing::info!(timeout_ms = timeout.as_millis() as u64, "setting request timeout");
        self.session.scratch.set_timeout(timeout);
        Ok(())
    }

    /// ``When I execute HTTP $method request for resource with URL `$url` ``
    pub async fn execute_request(&mut self, method: &str, url: &str) -> Result<()> {
        let method = HttpMethod::parse(&self.context.resolve(method))?;
        let url = self.context.resolve(url);
        tracing::info!(%method, %url, "executing HTTP request");
        self.session.execute(method, &url).await
    }

    fn header_rows(&self, table: &Table) -> Result<Vec<(String, String)>> {
        (0..table.len())
            .map(|row| -> Result<(String, String)> {
                let name = table.required(row, "name")?;
                let value = table.required(row, "value")?;
                Ok((self.context.resolve(name), self.context.resolve(value)))
            })
            .collect()
    }
}
