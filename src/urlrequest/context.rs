//! User agent configuration.
//!
//! Everything an agent needs to build requests lives here: timeouts, the
//! redirect bound, proxy, caller headers, cookie persistence and TLS.

use crate::cookies::persistence::CookieStore;
use crate::socket::connectjob::{ConnectOptions, DEFAULT_CONNECT_TIMEOUT, SOCKET_BLOCK_SIZE};
use crate::socket::proxy::ProxySettings;
use crate::socket::tls::TlsConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_REDIRECTS: usize = 3;

/// A caller-supplied header value.
#[derive(Clone)]
pub enum HeaderValue {
    Static(String),
    /// Evaluated once per request attempt, right before it is written.
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl HeaderValue {
    pub fn dynamic<F>(producer: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        HeaderValue::Dynamic(Arc::new(producer))
    }

    pub fn evaluate(&self) -> String {
        match self {
            HeaderValue::Static(value) => value.clone(),
            HeaderValue::Dynamic(producer) => producer(),
        }
    }
}

impl fmt::Debug for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            HeaderValue::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Static(value.trim().to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Static(value.trim().to_string())
    }
}

/// Configuration options for a [`UserAgent`](crate::urlrequest::agent::UserAgent).
#[derive(Clone)]
pub struct UserAgentConfig {
    /// Bounds connect and every read or write.
    pub connection_timeout: Duration,

    /// Redirects followed before the last redirect response is returned.
    pub max_redirects: usize,

    /// Proxy settings (None for direct connections).
    pub proxy: Option<ProxySettings>,

    pub cookies_enabled: bool,

    /// Extra request headers, lowercase names, in insertion order.
    pub headers: Vec<(String, HeaderValue)>,

    /// Session id the cookie jar is persisted under.
    pub session: Option<String>,

    pub cookie_store: Option<Arc<dyn CookieStore>>,

    pub tls: TlsConfig,

    /// Network read chunk size.
    pub block_size: usize,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            proxy: None,
            cookies_enabled: true,
            headers: Vec::new(),
            session: None,
            cookie_store: None,
            tls: TlsConfig::default(),
            block_size: SOCKET_BLOCK_SIZE,
        }
    }
}

impl fmt::Debug for UserAgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAgentConfig")
            .field("connection_timeout", &self.connection_timeout)
            .field("max_redirects", &self.max_redirects)
            .field("proxy", &self.proxy.as_ref().map(|p| format!("{}:{}", p.host(), p.port())))
            .field("cookies_enabled", &self.cookies_enabled)
            .field("headers", &self.headers)
            .field("session", &self.session)
            .field("cookie_store", &self.cookie_store.is_some())
            .field("tls", &self.tls)
            .field("block_size", &self.block_size)
            .finish()
    }
}

impl UserAgentConfig {
    /// Set a header, replacing any value already stored under the same
    /// case-insensitive name. Empty names are ignored.
    pub fn set_header(&mut self, name: &str, value: HeaderValue) {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return;
        }
        match self.headers.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Add every `Name: value` line in `text`. Lines without a name before
    /// the first `:` are skipped.
    pub fn add_header_lines(&mut self, text: &str) {
        for line in text.lines() {
            let Some((name, value)) = line.trim().split_once(':') else {
                continue;
            };
            if name.trim().is_empty() {
                continue;
            }
            self.set_header(name, HeaderValue::from(value));
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            timeout: self.connection_timeout,
            tls: self.tls.clone(),
            block_size: self.block_size,
        }
    }
}
