//! Where a request goes: straight to the origin or through a proxy.

use crate::base::neterror::NetError;
use crate::base::urlext::UrlExt;
use crate::socket::connectjob::ConnectOptions;
use crate::socket::proxy::ProxySettings;
use crate::socket::transport::Transport;
use http::Method;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub enum Route {
    Direct { url: Url },
    Proxy { url: Url, proxy: ProxySettings },
}

impl Route {
    pub fn direct(url: Url) -> Self {
        Route::Direct { url }
    }

    pub fn via_proxy(url: Url, proxy: ProxySettings) -> Self {
        Route::Proxy { url, proxy }
    }

    /// Proxy route when one is configured, except for `file:` targets.
    pub fn for_url(url: Url, proxy: Option<&ProxySettings>) -> Self {
        match proxy {
            Some(proxy) if url.scheme() != "file" => Self::via_proxy(url, proxy.clone()),
            _ => Self::direct(url),
        }
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        match self {
            Route::Direct { url } | Route::Proxy { url, .. } => url,
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self, Route::Proxy { .. })
    }

    /// Origin-form for direct routes, absolute-form through a proxy.
    pub fn request_line(&self, method: &Method) -> String {
        match self {
            Route::Direct { url } => format!("{} {} HTTP/1.0", method, url.request_target()),
            Route::Proxy { url, .. } => {
                let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
                format!(
                    "{} {}://{}{}{} HTTP/1.0",
                    method,
                    url.scheme(),
                    url.host_str().unwrap_or_default(),
                    port,
                    url.request_target()
                )
            }
        }
    }

    /// Names the origin on direct routes and the proxy otherwise.
    pub fn host_line(&self) -> String {
        match self {
            Route::Direct { url } => {
                let host = url.host_str().unwrap_or_default();
                match url.port() {
                    Some(port) => format!("Host: {}:{}", host, port),
                    None => format!("Host: {}", host),
                }
            }
            Route::Proxy { proxy, .. } => format!("Host: {}:{}", proxy.host(), proxy.port()),
        }
    }

    /// Scheme, host and port of the socket peer.
    fn endpoint(&self) -> Result<(&str, &str, u16), NetError> {
        match self {
            Route::Direct { url } => {
                let scheme = url.scheme();
                if scheme == "file" {
                    return Ok((scheme, "", 0));
                }
                let host = url.host_str().ok_or_else(|| NetError::invalid_url(url.as_str()))?;
                let default_port = if scheme == "https" { 443 } else { 80 };
                Ok((scheme, host, url.port().unwrap_or(default_port)))
            }
            Route::Proxy { proxy, .. } => Ok((proxy.scheme(), proxy.host(), proxy.port())),
        }
    }

    /// Open the transport and write the request line, `Host`, optional
    /// `Proxy-Authorization` and `Connection: close`.
    pub async fn create_connection(
        &self,
        method: &Method,
        options: &ConnectOptions,
    ) -> Result<Transport, NetError> {
        let (scheme, host, port) = self.endpoint()?;
        let mut transport = if scheme == "file" {
            Transport::open_file(self.url(), options).await?
        } else {
            Transport::connect(scheme, host, port, options).await?
        };

        let request_line = self.request_line(method);
        debug!(request = %request_line, proxy = self.is_proxy(), "Sending request");
        transport.write(format!("{}\r\n", request_line).as_bytes()).await?;
        transport.write(format!("{}\r\n", self.host_line()).as_bytes()).await?;
        if let Route::Proxy { proxy, .. } = self {
            if let Some(auth) = proxy.auth_header() {
                transport.write(format!("Proxy-Authorization: {}\r\n", auth).as_bytes()).await?;
            }
        }
        transport.write(b"Connection: close\r\n").await?;
        Ok(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_direct_lines() {
        let route = Route::direct(url("http://example.com/a/b.html?x=1&y=2"));
        assert_eq!(route.request_line(&Method::GET), "GET /a/b.html?x=1&y=2 HTTP/1.0");
        assert_eq!(route.host_line(), "Host: example.com");

        let route = Route::direct(url("http://example.com:8000/"));
        assert_eq!(route.host_line(), "Host: example.com:8000");
        assert_eq!(route.request_line(&Method::HEAD), "HEAD / HTTP/1.0");
    }

    #[test]
    fn test_proxy_lines() {
        let proxy = ProxySettings::new("proxy.local:3128").unwrap();
        let route = Route::via_proxy(url("https://example.com:8443/a?q=1"), proxy);
        assert_eq!(route.request_line(&Method::POST), "POST https://example.com:8443/a?q=1 HTTP/1.0");
        assert_eq!(route.host_line(), "Host: proxy.local:3128");

        let proxy = ProxySettings::new("proxy.local").unwrap();
        let route = Route::via_proxy(url("http://example.com/"), proxy);
        assert_eq!(route.request_line(&Method::GET), "GET http://example.com/ HTTP/1.0");
        assert_eq!(route.host_line(), "Host: proxy.local:8080");
    }

    #[test]
    fn test_file_urls_skip_proxy() {
        let proxy = ProxySettings::new("proxy.local:3128").unwrap();
        assert!(!Route::for_url(url("file:///tmp/x.html"), Some(&proxy)).is_proxy());
        assert!(Route::for_url(url("http://example.com/"), Some(&proxy)).is_proxy());
        assert!(!Route::for_url(url("http://example.com/"), None).is_proxy());
    }

    #[test]
    fn test_endpoint_defaults() {
        assert_eq!(Route::direct(url("http://example.com/")).endpoint().unwrap(), ("http", "example.com", 80));
        assert_eq!(Route::direct(url("https://example.com/")).endpoint().unwrap(), ("https", "example.com", 443));
        let proxy = ProxySettings::new("https://proxy.local").unwrap();
        assert_eq!(
            Route::via_proxy(url("http://example.com/"), proxy).endpoint().unwrap(),
            ("https", "proxy.local", 8080)
        );
    }
}
