//! Cookie store for HTTP steps.
//!
//! Cookies received in `Set-Cookie` headers are kept for the rest of the
//! scenario and sent back on matching requests.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCookie {
    pub name: String,
    pub value: String,
    /// Lower-cased host the cookie applies to (and its subdomains).
    pub domain: String,
    pub path: String,
    pub secure: bool,
}

impl HttpCookie {
    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str().map(str::to_lowercase) else {
            return false;
        };
        let scheme_matches = !self.secure || url.scheme() == "https";
        domain_matches(&host, &self.domain) && path_matches(url.path(), &self.path) && scheme_matches
    }
}

/// `host` is `domain` or one of its subdomains.
fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Request path lies at or below the cookie path, on a segment boundary.
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

#[derive(Debug, Default)]
pub struct CookieStore {
    cookies: Vec<HttpCookie>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the cookie described by a `Set-Cookie` header received from `url`.
    ///
    /// `Max-Age=0` (or negative) removes a stored cookie with the same name,
    /// domain and path.
    pub fn store_set_cookie(&mut self, url: &Url, header: &str) {
        let mut attributes = header.split(';').map(str::trim);
        let Some((name, value)) = attributes.next().and_then(|pair| pair.split_once('=')) else {
            tracing::debug!(header, "ignoring malformed Set-Cookie header");
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let host = url.host_str().unwrap_or_default().to_lowercase();
        let mut cookie = HttpCookie {
            name: name.to_string(),
            value: value.trim().trim_matches('"').to_string(),
            domain: host.clone(),
            path: default_path(url),
            secure: false,
        };
        let mut expired = false;

        for attribute in attributes {
            let (key, val) = attribute.split_once('=').unwrap_or((attribute, ""));
            match key.trim().to_ascii_lowercase().as_str() {
                "domain" if !val.is_empty() => {
                    cookie.domain = val.trim().trim_start_matches('.').to_lowercase();
                }
                "path" if val.starts_with('/') => cookie.path = val.trim().to_string(),
                "secure" => cookie.secure = true,
                "max-age" => expired = val.trim().parse::<i64>().is_ok_and(|age| age <= 0),
                _ => {}
            }
        }

        if !domain_matches(&host, &cookie.domain) {
            tracing::debug!(name = %cookie.name, domain = %cookie.domain, %host, "ignoring cookie for foreign domain");
            return;
        }

        self.cookies.retain(|c| {
            !(c.name == cookie.name && c.domain == cookie.domain && c.path == cookie.path)
        });
        if expired {
            tracing::debug!(name = %cookie.name, "cookie expired by server");
        } else {
            self.cookies.push(cookie);
        }
    }

    /// `Cookie` header value for a request to `url`, if any cookie matches.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| c.matches(url))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    pub fn get(&self, name: &str) -> Option<&HttpCookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    /// Remove every cookie named `name`. Returns whether any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.cookies.len();
        self.cookies.retain(|c| c.name != name);
        before != self.cookies.len()
    }

    pub fn all(&self) -> &[HttpCookie] {
        &self.cookies
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

/// Default cookie path: the request path up to its last `/`.
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(pos) => path[..pos].to_string(),
    }
}
