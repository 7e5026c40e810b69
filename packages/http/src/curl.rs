//! cURL command reconstruction for diagnostics.
//!
//! Every executed request is rendered as a cURL command so a failing call
//! can be replayed by hand:
//!
//! ```text
//! curl -X POST 'https://example.org/api/users' \
//!   -H 'Content-Type: application/json' \
//!   --data '{"name":"Ann"}'
//! ```

use std::sync::LazyLock;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;

/// Request as it was sent, captured for reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn to_curl(&self) -> String {
        to_curl(self)
    }
}

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BOUNDARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*multipart/form-data\s*;.*?boundary="?([^";]+)"?"#).expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:^|[;\s])name="([^"]*)""#).expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename="([^"]*)""#).expect("valid regex"));

const CONTINUATION: &str = " \\\n  ";

/// Build the cURL command for `request`.
pub fn to_curl(request: &CapturedRequest) -> String {
    let boundary = request
        .header("Content-Type")
        .and_then(|ct| BOUNDARY_PATTERN.captures(ct))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    let form_options = match (&boundary, &request.body) {
        (Some(boundary), Some(body)) => multipart_options(body, boundary),
        _ => None,
    };

    let mut options = Vec::new();
    for (name, value) in &request.headers {
        if name.eq_ignore_ascii_case("Content-Length") {
            continue;
        }
        // curl writes its own multipart boundary
        if form_options.is_some() && name.eq_ignore_ascii_case("Content-Type") {
            continue;
        }
        options.push(format!("-H {}", shell_quote(&format!("{name}: {value}"))));
    }

    match (form_options, &request.body) {
        (Some(form), _) => options.extend(form),
        (None, Some(body)) if !body.is_empty() => match std::str::from_utf8(body) {
            Ok(text) => options.push(format!("--data {}", shell_quote(text))),
            Err(_) => options.push(format!(
                "--data-binary {}",
                shell_quote(&format!("<{} bytes of binary data>", body.len()))
            )),
        },
        _ => {}
    }

    let mut command = format!("curl -X {} {}", request.method, shell_quote(&request.url));
    for option in options {
        command.push_str(CONTINUATION);
        command.push_str(&option);
    }
    command
}

/// Wrap in single quotes; embedded single quotes become `'\''`.
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// Escape a value for a double-quoted `-F` argument.
fn form_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', r"\\").replace('"', "\\\""))
}

/// Split a multipart body on its boundary and render one `-F` per part.
///
/// Returns `None` when the body does not parse as multipart, in which case
/// the caller falls back to `--data`.
fn multipart_options(body: &[u8], boundary: &str) -> Option<Vec<String>> {
    let delimiter = BytesRegex::new(&format!(
        r"(?-u)(?:\r?\n)?--{}(?:--)?[ \t]*(?:\r?\n)?",
        regex::escape(boundary)
    ))
    .ok()?;

    let mut options = Vec::new();
    for part in delimiter.split(body).filter(|p| !p.is_empty()) {
        let (head, content) = split_part(part)?;
        let head = String::from_utf8_lossy(head);

        let mut name = None;
        let mut file_name = None;
        let mut content_type = None;
        for line in head.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("Content-Disposition") {
                name = NAME_PATTERN
                    .captures(value)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
                file_name = FILENAME_PATTERN
                    .captures(value)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
            } else if key.trim().eq_ignore_ascii_case("Content-Type") {
                content_type = Some(value.trim().to_string());
            }
        }

        let name = name?;
        let argument = match file_name {
            Some(file_name) => {
                let mut arg = format!("{name}=@{}", form_quote(&file_name));
                if let Some(content_type) = content_type {
                    arg.push_str(&format!(";type={content_type}"));
                }
                arg
            }
            None => format!("{name}={}", form_quote(&String::from_utf8_lossy(content))),
        };
        options.push(format!("-F {}", shell_quote(&argument)));
    }

    (!options.is_empty()).then_some(options)
}

/// Split a part into its header block and content.
fn split_part(part: &[u8]) -> Option<(&[u8], &[u8])> {
    for separator in [&b"\r\n\r\n"[..], &b"\n\n"[..]] {
        if let Some(pos) = part
            .windows(separator.len())
            .position(|window| window == separator)
        {
            return Some((&part[..pos], &part[pos + separator.len()..]));
        }
    }
    None
}
