//! One HTTP/1.0 request over a fresh transport.

use crate::base::neterror::NetError;
use crate::cookies::jar::CookieJar;
use crate::http::encoding::Encoding;
use crate::http::response::{FetchError, HttpResponse};
use crate::socket::connectjob::ConnectOptions;
use crate::socket::route::Route;
use crate::socket::transport::Transport;
use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};
use url::Url;

/// A request ready to be written: route, payload, extra header lines and
/// the cookies selected for it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    route: Route,
    encoding: Encoding,
    headers: Vec<String>,
    cookies: Vec<String>,
}

impl HttpRequest {
    pub fn new(route: Route, encoding: Encoding) -> Self {
        Self { route, encoding, headers: Vec::new(), cookies: Vec::new() }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Add a raw `Name: value` line, sent after the route's own lines.
    pub fn add_header_line(&mut self, line: impl Into<String>) {
        self.headers.push(line.into());
    }

    pub fn header_lines(&self) -> &[String] {
        &self.headers
    }

    /// Select every jar cookie in scope for `url`.
    pub fn read_cookies_from_jar(&mut self, jar: &CookieJar, url: &Url) {
        self.cookies = jar.select_as_pairs(url);
    }

    pub fn cookie_line(&self) -> Option<String> {
        if self.cookies.is_empty() {
            None
        } else {
            Some(format!("Cookie: {}", self.cookies.join("; ")))
        }
    }

    /// Connect, send the request and read the whole response.
    pub async fn fetch(&self, options: &ConnectOptions) -> Result<HttpResponse, FetchError> {
        let url = self.route.url().clone();
        let mut transport = match self.route.create_connection(self.encoding.method(), options).await {
            Ok(transport) => transport,
            Err(e) => return Err(FetchError::new(e, url, self.encoding.clone(), Bytes::new())),
        };

        let result = self.exchange(&mut transport).await;
        transport.close();
        let sent = Bytes::copy_from_slice(transport.sent());

        match result {
            Ok(raw) => HttpResponse::parse(&raw, url, self.encoding.clone(), sent),
            Err(e) => Err(FetchError::new(e, url, self.encoding.clone(), sent)),
        }
    }

    async fn exchange(&self, transport: &mut Transport) -> Result<Bytes, NetError> {
        self.dispatch(transport).await?;

        let mut raw = BytesMut::new();
        loop {
            let chunk = transport.read().await?;
            if chunk.is_empty() {
                break;
            }
            trace!(bytes = chunk.len(), "Read chunk");
            raw.extend_from_slice(&chunk);
        }
        debug!(url = %self.route.url(), bytes = raw.len(), "Response read");
        Ok(raw.freeze())
    }

    async fn dispatch(&self, transport: &mut Transport) -> Result<(), NetError> {
        for line in &self.headers {
            transport.write(format!("{}\r\n", line).as_bytes()).await?;
        }
        if let Some(line) = self.cookie_line() {
            transport.write(format!("{}\r\n", line).as_bytes()).await?;
        }
        self.encoding.write_headers_to(transport).await?;
        transport.write(b"\r\n").await?;
        self.encoding.write_to(transport).await
    }
}
