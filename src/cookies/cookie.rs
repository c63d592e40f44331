//! A single cookie as held by the jar.

use crate::cookies::tld::truncate_host;
use time::{Duration, OffsetDateTime};

/// One cookie. The path always starts and ends with `/`; the host, when
/// present, is the truncated form produced by [`truncate_host`]. No expiry
/// means a session cookie. An empty value is a cleared cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    host: Option<String>,
    name: String,
    value: String,
    path: String,
    expiry: Option<OffsetDateTime>,
    is_secure: bool,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        path: &str,
        expiry: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            host: None,
            name: name.into(),
            value: value.into(),
            path: fix_path(path),
            expiry,
            is_secure: false,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.is_secure = secure;
        self
    }

    /// Scope the cookie to `host`. Returns false, leaving the host
    /// untouched, when the host cannot be truncated.
    pub fn set_host(&mut self, host: &str) -> bool {
        match truncate_host(host) {
            Some(truncated) => {
                self.host = Some(truncated);
                true
            }
            None => false,
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn expiry(&self) -> Option<OffsetDateTime> {
        self.expiry
    }

    pub fn is_secure(&self) -> bool {
        self.is_secure
    }

    pub fn is_session(&self) -> bool {
        self.expiry.is_none()
    }

    /// True when `host` truncates to this cookie's host.
    pub fn is_valid_host(&self, host: &str) -> bool {
        truncate_host(host).as_deref() == self.host()
    }

    /// True when this cookie's path is a prefix of `path`.
    pub fn is_valid_path(&self, path: &str) -> bool {
        fix_path(path).starts_with(&self.path)
    }

    /// Session cookies count as expired.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        match self.expiry {
            Some(expiry) => expiry < now,
            None => true,
        }
    }

    /// Move the expiry `seconds` into the past. Session cookies are untouched.
    pub fn age_prematurely(&mut self, seconds: i64) {
        if let Some(expiry) = self.expiry {
            self.expiry = Some(expiry - Duration::seconds(seconds));
        }
    }

    /// Parse the text after `Set-Cookie:`.
    ///
    /// The first `;` segment is `name=value`; later `key=value` segments
    /// supply `path` and `expires`, and a bare `secure` sets the flag. Other
    /// attributes are ignored. Returns `None` when the first segment has no
    /// `=`.
    pub fn parse_set_cookie(line: &str) -> Option<Self> {
        let mut parts = line.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut path = "";
        let mut expiry = None;
        let mut secure = false;
        for part in parts {
            match part.split_once('=') {
                Some((key, val)) => {
                    let key = key.trim();
                    if key.eq_ignore_ascii_case("path") {
                        path = val.trim();
                    } else if key.eq_ignore_ascii_case("expires") {
                        expiry = parse_expiry(val.trim());
                    }
                }
                None => {
                    if part.trim().eq_ignore_ascii_case("secure") {
                        secure = true;
                    }
                }
            }
        }

        Some(Cookie::new(name, value.trim(), path, expiry).with_secure(secure))
    }

    /// Format as a `Set-Cookie` header value.
    pub fn to_set_cookie_line(&self) -> String {
        let mut builder = cookie::Cookie::build((self.name.clone(), self.value.clone()))
            .path(self.path.clone())
            .secure(self.is_secure);
        if let Some(expiry) = self.expiry {
            builder = builder.expires(expiry);
        }
        builder.build().to_string()
    }
}

/// Parse an HTTP date as used by the `Expires` attribute.
pub fn parse_expiry(text: &str) -> Option<OffsetDateTime> {
    cookie::Cookie::parse(format!("x=y; Expires={}", text)).ok()?.expires_datetime()
}

/// Ensure a leading and trailing `/`.
pub fn fix_path(path: &str) -> String {
    let mut fixed = String::with_capacity(path.len() + 2);
    if !path.starts_with('/') {
        fixed.push('/');
    }
    fixed.push_str(path);
    if !fixed.ends_with('/') {
        fixed.push('/');
    }
    fixed
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_path_is_normalised() {
        assert_eq!(Cookie::new("a", "1", "", None).path(), "/");
        assert_eq!(Cookie::new("a", "1", "docs", None).path(), "/docs/");
        assert_eq!(Cookie::new("a", "1", "/docs", None).path(), "/docs/");
        assert_eq!(Cookie::new("a", "1", "/docs/", None).path(), "/docs/");
    }

    #[test]
    fn test_valid_path() {
        let cookie = Cookie::new("a", "1", "/docs/", None);
        assert!(cookie.is_valid_path("/docs/index.html"));
        assert!(cookie.is_valid_path("/docs"));
        assert!(!cookie.is_valid_path("/"));
        assert!(!cookie.is_valid_path("/documents/"));
    }

    #[test]
    fn test_host() {
        let mut cookie = Cookie::new("a", "1", "/", None);
        assert!(!cookie.set_host("localhost"));
        assert_eq!(cookie.host(), None);
        assert!(cookie.is_valid_host("localhost"));

        assert!(cookie.set_host("www.example.com"));
        assert_eq!(cookie.host(), Some("example.com"));
        assert!(cookie.is_valid_host("shop.example.com"));
        assert!(!cookie.is_valid_host("example.org"));
    }

    #[test]
    fn test_expiry() {
        let now = datetime!(2024-06-01 12:00 UTC);
        let session = Cookie::new("a", "1", "/", None);
        assert!(session.is_expired(now));

        let mut cookie = Cookie::new("a", "1", "/", Some(datetime!(2024-06-01 12:00:30 UTC)));
        assert!(!cookie.is_expired(now));
        cookie.age_prematurely(60);
        assert!(cookie.is_expired(now));
        assert_eq!(cookie.expiry(), Some(datetime!(2024-06-01 11:59:30 UTC)));
    }

    #[test]
    fn test_parse_set_cookie() {
        let cookie = Cookie::parse_set_cookie(
            " sid = abc123 ; Path=/app; Expires=Wed, 21 Oct 2037 07:28:00 GMT; HttpOnly; Secure",
        )
        .unwrap();
        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.path(), "/app/");
        assert_eq!(cookie.expiry(), Some(datetime!(2037-10-21 07:28:00 UTC)));
        assert!(cookie.is_secure());
        assert_eq!(cookie.host(), None);
    }

    #[test]
    fn test_parse_set_cookie_rejects_bare_token() {
        assert!(Cookie::parse_set_cookie("garbage").is_none());
        assert!(Cookie::parse_set_cookie("=value").is_none());
    }

    #[test]
    fn test_parse_keeps_equals_in_value() {
        let cookie = Cookie::parse_set_cookie("token=a=b=c; path=/").unwrap();
        assert_eq!(cookie.value(), "a=b=c");
    }

    #[test]
    fn test_set_cookie_line_roundtrip() {
        let original = Cookie::new("theme", "dark", "/prefs", Some(datetime!(2031-02-03 04:05:06 UTC)))
            .with_secure(true);
        let line = original.to_set_cookie_line();
        let parsed = Cookie::parse_set_cookie(&line).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_expiry_invalid() {
        assert_eq!(parse_expiry("not a date"), None);
    }
}
