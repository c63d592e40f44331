//! Response header block parsing.

use crate::cookies::cookie::Cookie;
use std::collections::HashMap;

const REDIRECT_CODES: [u16; 4] = [301, 302, 303, 307];

/// Parsed response header block.
///
/// Known headers are pulled out into typed fields; every `name: value`
/// line is also kept in a lowercase-name map (last occurrence wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    raw: String,
    http_version: Option<String>,
    response_code: Option<u16>,
    mime_type: Option<String>,
    content_encoding: Option<String>,
    location: Option<String>,
    cookies: Vec<Cookie>,
    authentication: Option<String>,
    realm: Option<String>,
    fields: HashMap<String, String>,
}

impl HeaderBlock {
    pub fn parse(raw: &str) -> Self {
        let mut block = Self { raw: raw.to_string(), ..Self::default() };
        for line in raw.split('\n') {
            block.parse_line(line.trim_end_matches('\r'));
        }
        block
    }

    fn parse_line(&mut self, line: &str) {
        if starts_with_ignore_case(line, "HTTP/") {
            self.parse_status_line(&line[5..]);
        }

        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || name.starts_with("http/") {
            return;
        }

        match name.as_str() {
            "content-type" => self.mime_type = Some(value.trim().to_string()),
            "content-encoding" => self.content_encoding = Some(value.trim().to_string()),
            "location" => self.location = Some(value.trim().to_string()),
            "set-cookie" => {
                if let Some(cookie) = Cookie::parse_set_cookie(value) {
                    self.cookies.push(cookie);
                }
            }
            "www-authenticate" => self.parse_challenge(value),
            _ => {}
        }
        self.fields.insert(name, value.trim().to_string());
    }

    /// `1.1 200 OK` (after the `HTTP/` prefix).
    fn parse_status_line(&mut self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let version = parts.next().filter(|v| !v.is_empty());
        let code = parts.next().and_then(|c| c.parse::<u16>().ok());
        if let (Some(version), Some(code)) = (version, code) {
            self.http_version = Some(version.to_string());
            self.response_code = Some(code);
        }
    }

    /// `<scheme> realm="<name>"`.
    fn parse_challenge(&mut self, value: &str) {
        let value = value.trim();
        let Some((scheme, params)) = value.split_once(char::is_whitespace) else {
            return;
        };
        let lower = params.to_ascii_lowercase();
        let Some(start) = lower.find("realm=\"") else {
            return;
        };
        let quoted = &params[start + 7..];
        let Some(end) = quoted.find('"') else {
            return;
        };
        self.authentication = Some(scheme.to_string());
        self.realm = Some(quoted[..end].trim().to_string());
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn http_version(&self) -> Option<&str> {
        self.http_version.as_deref()
    }

    /// Status code, 0 when no status line was seen.
    pub fn response_code(&self) -> u16 {
        self.response_code.unwrap_or(0)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn authentication(&self) -> Option<&str> {
        self.authentication.as_deref()
    }

    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    /// Value of any header by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn is_redirect(&self) -> bool {
        REDIRECT_CODES.contains(&self.response_code())
            && self.location.as_deref().is_some_and(|l| !l.is_empty())
    }

    pub fn is_challenge(&self) -> bool {
        self.response_code() == 401
            && self.authentication.as_deref().is_some_and(|a| !a.is_empty())
            && self.realm.as_deref().is_some_and(|r| !r.is_empty())
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
