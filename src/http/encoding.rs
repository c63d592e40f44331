//! Request method plus payload.

use crate::base::neterror::NetError;
use crate::socket::transport::Transport;
use bytes::Bytes;
use http::Method;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const RAW_CONTENT_TYPE: &str = "application/octet-stream";

/// Method, form parameters and an optional raw body.
///
/// Only POST sends its parameters as the body; every other method has its
/// parameters folded into the URL query by the user agent before dispatch.
/// A raw body, when set, replaces the form body for any method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    method: Method,
    params: Vec<(String, String)>,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl Encoding {
    pub fn new(method: Method) -> Self {
        Self { method, params: Vec::new(), content_type: None, body: None }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn head() -> Self {
        Self::new(Method::HEAD)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Append a form parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Send `body` verbatim with the given content type.
    pub fn with_body(mut self, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Drop the form parameters. A raw body is kept.
    pub fn clear(&mut self) {
        self.params.clear();
    }

    fn has_body(&self) -> bool {
        self.body.is_some() || self.is_post()
    }

    /// Bytes written after the blank line.
    pub fn body(&self) -> Bytes {
        if let Some(body) = &self.body {
            return body.clone();
        }
        if !self.is_post() {
            return Bytes::new();
        }
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.params {
            form.append_pair(name, value);
        }
        Bytes::from(form.finish())
    }

    pub fn content_type(&self) -> Option<&str> {
        match (&self.content_type, &self.body) {
            (Some(ct), _) => Some(ct.as_str()),
            (None, Some(_)) => Some(RAW_CONTENT_TYPE),
            (None, None) if self.is_post() => Some(FORM_CONTENT_TYPE),
            _ => None,
        }
    }

    /// `Content-Length` and `Content-Type` for requests that carry a body.
    pub fn header_lines(&self) -> Vec<String> {
        if !self.has_body() {
            return Vec::new();
        }
        let mut lines = vec![format!("Content-Length: {}", self.body().len())];
        if let Some(ct) = self.content_type() {
            lines.push(format!("Content-Type: {}", ct));
        }
        lines
    }

    pub async fn write_headers_to(&self, transport: &mut Transport) -> Result<(), NetError> {
        for line in self.header_lines() {
            transport.write(format!("{}\r\n", line).as_bytes()).await?;
        }
        Ok(())
    }

    pub async fn write_to(&self, transport: &mut Transport) -> Result<(), NetError> {
        let body = self.body();
        if body.is_empty() {
            return Ok(());
        }
        transport.write(&body).await
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::get()
    }
}
