use crate::base::neterror::NetError;
use crate::base::urlext::UrlExt;
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use url::Url;
use zeroize::Zeroizing;

/// Port used when the proxy address does not name one.
pub const DEFAULT_PROXY_PORT: u16 = 8080;

/// Forward HTTP proxy.
#[derive(Clone)]
pub struct ProxySettings {
    /// Proxy URL (e.g., `http://proxy.com:8080`)
    pub url: Url,
    port: u16,
    /// Proxy username for authentication
    pub username: Option<String>,
    /// Proxy password (zeroized on drop)
    pub password: Option<Zeroizing<String>>,
}

impl fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySettings")
            .field("url", &format!("{}://{}:{}", self.scheme(), self.host(), self.port))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProxySettings {
    /// Parse a proxy address. `host:port` is accepted and treated as
    /// `http://host:port`. Credentials embedded in the URL are picked up.
    pub fn new(proxy: &str) -> Result<Self, NetError> {
        let proxy = proxy.trim();
        let lower = proxy.to_ascii_lowercase();
        let raw = if lower.starts_with("http://") || lower.starts_with("https://") {
            proxy.to_string()
        } else if lower.contains("://") {
            let scheme = proxy.split("://").next().unwrap_or_default();
            return Err(NetError::UnknownUrlScheme { scheme: scheme.to_string() });
        } else {
            format!("http://{}", proxy)
        };

        let url = Url::parse(&raw).map_err(|_| NetError::invalid_url(proxy))?;
        if url.host_str().is_none() {
            return Err(NetError::invalid_url(proxy));
        }
        let port = explicit_port(&raw).or(url.port()).unwrap_or(DEFAULT_PROXY_PORT);

        let mut settings = Self { url, port, username: None, password: None };
        if let Some((user, pass)) = settings.url.credentials() {
            settings = settings.with_auth(&user, &pass);
        }
        Ok(settings)
    }

    /// Create proxy from environment variables.
    ///
    /// Checks `HTTPS_PROXY`/`https_proxy` then `HTTP_PROXY`/`http_proxy`.
    pub fn from_env() -> Option<Self> {
        let url_str = std::env::var("HTTPS_PROXY")
            .or_else(|_| std::env::var("https_proxy"))
            .or_else(|_| std::env::var("HTTP_PROXY"))
            .or_else(|_| std::env::var("http_proxy"))
            .ok()?;

        Self::new(&url_str).ok()
    }

    /// Add authentication credentials.
    pub fn with_auth(mut self, user: &str, pass: &str) -> Self {
        self.username = Some(user.to_string());
        self.password = Some(Zeroizing::new(pass.to_string()));
        self
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Check if this proxy requires authentication.
    pub fn requires_auth(&self) -> bool {
        matches!((&self.username, &self.password), (Some(u), Some(p)) if !u.is_empty() && !p.is_empty())
    }

    /// `Proxy-Authorization` header value, when both username and password
    /// are non-empty.
    pub fn auth_header(&self) -> Option<String> {
        if !self.requires_auth() {
            return None;
        }
        let (u, p) = (self.username.as_deref()?, self.password.as_deref()?);
        let creds = Zeroizing::new(format!("{}:{}", u, p.as_str()));
        Some(format!("Basic {}", general_purpose::STANDARD.encode(creds.as_bytes())))
    }
}

/// Port written in the authority of `raw`, including scheme defaults that
/// `Url::port` hides.
fn explicit_port(raw: &str) -> Option<u16> {
    let rest = raw.split_once("://").map(|(_, r)| r).unwrap_or(raw);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let (host, port) = host_port.rsplit_once(':')?;
    if host.starts_with('[') && !host.ends_with(']') {
        return None;
    }
    port.parse().ok()
}
