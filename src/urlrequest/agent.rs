//! Redirect-following user agent.

use crate::base::neterror::NetError;
use crate::base::urlext::UrlExt;
use crate::cookies::jar::CookieJar;
use crate::http::authenticator::{AuthScheme, Authenticator};
use crate::http::encoding::Encoding;
use crate::http::request::HttpRequest;
use crate::http::response::{FetchError, HttpResponse};
use crate::socket::proxy::ProxySettings;
use crate::socket::route::Route;
use crate::urlrequest::context::{HeaderValue, UserAgentConfig};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, warn};
use url::Url;

/// A small browser: cookie jar, Basic-auth realms, caller headers and a
/// bounded redirect chase over one-shot HTTP/1.0 connections.
///
/// Fetching takes `&mut self`, so an agent never has two requests in
/// flight. Use one agent per concurrent task.
#[derive(Debug)]
pub struct UserAgent {
    config: UserAgentConfig,
    cookie_jar: CookieJar,
    authenticator: Authenticator,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgent {
    pub fn new() -> Self {
        Self::with_config(UserAgentConfig::default())
    }

    /// Build an agent. With both a session id and a store configured, the
    /// jar is restored from the store.
    pub fn with_config(config: UserAgentConfig) -> Self {
        let cookie_jar = match (&config.session, &config.cookie_store) {
            (Some(session), Some(store)) => CookieJar::with_store(session.clone(), store.clone()),
            _ => CookieJar::new(),
        };
        Self { config, cookie_jar, authenticator: Authenticator::new() }
    }

    pub fn config(&self) -> &UserAgentConfig {
        &self.config
    }

    /// Start a new browsing session: expire session cookies (and cookies
    /// stale as of `reference`) and forget every realm.
    pub fn restart(&mut self, reference: Option<OffsetDateTime>) {
        self.cookie_jar.restart_session(reference);
        self.authenticator.restart_session();
    }

    /// Send `name: value` with every request. Names are case-insensitive;
    /// setting a name again replaces its value.
    pub fn add_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.config.set_header(name, HeaderValue::from(value));
        self
    }

    /// Header whose value is produced fresh for each request attempt.
    pub fn add_dynamic_header<F>(&mut self, name: &str, producer: F) -> &mut Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.config.set_header(name, HeaderValue::dynamic(producer));
        self
    }

    /// Add each `Name: value` line of `text`.
    pub fn add_header_lines(&mut self, text: &str) -> &mut Self {
        self.config.add_header_lines(text);
        self
    }

    /// Make every stored cookie `seconds` older.
    pub fn age_cookies(&mut self, seconds: i64) {
        self.cookie_jar.age_prematurely(seconds);
    }

    pub fn set_cookie(
        &mut self,
        name: &str,
        value: &str,
        host: Option<&str>,
        path: &str,
        expiry: Option<OffsetDateTime>,
    ) {
        self.cookie_jar.set(name, value, host, path, expiry);
    }

    pub fn cookie_value(&self, host: &str, path: &str, name: &str) -> Option<&str> {
        self.cookie_jar.get_cookie_value(host, path, name)
    }

    /// Cookie value in scope for `base`, or `None` without a base URL.
    pub fn base_cookie_value(&self, name: &str, base: Option<&Url>) -> Option<&str> {
        let base = base?;
        self.cookie_value(base.host_str().unwrap_or_default(), base.path(), name)
    }

    pub fn ignore_cookies(&mut self) {
        self.config.cookies_enabled = false;
    }

    pub fn use_cookies(&mut self) {
        self.config.cookies_enabled = true;
    }

    pub fn set_connection_timeout(&mut self, timeout: Duration) {
        self.config.connection_timeout = timeout;
    }

    pub fn set_maximum_redirects(&mut self, max: usize) {
        self.config.max_redirects = max;
    }

    /// Route requests through `proxy`. An empty address disables proxying.
    /// Credentials are used only when both are given.
    pub fn use_proxy(
        &mut self,
        proxy: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), NetError> {
        if proxy.trim().is_empty() {
            self.disable_proxy();
            return Ok(());
        }
        let mut settings = ProxySettings::new(proxy)?;
        if let (Some(user), Some(pass)) = (username, password) {
            settings = settings.with_auth(user, pass);
        }
        debug!(host = settings.host(), port = settings.port(), "Using proxy");
        self.config.proxy = Some(settings);
        Ok(())
    }

    pub fn disable_proxy(&mut self) {
        self.config.proxy = None;
    }

    /// Credentials for a realm already seen on `host`.
    pub fn set_identity(&mut self, host: &str, realm: &str, username: &str, password: &str) {
        self.authenticator.set_identity_for_realm(host, realm, username, password);
    }

    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Fetch `url`, following redirects up to the configured bound.
    ///
    /// Non-POST parameters are moved into the query string first. Cookies
    /// from every hop are stored before deciding whether to follow it, and
    /// a final 401 challenge registers the realm against the requested URL,
    /// not wherever the redirects ended up.
    pub async fn fetch_response(
        &mut self,
        mut url: Url,
        mut encoding: Encoding,
    ) -> Result<HttpResponse, FetchError> {
        if !encoding.is_post() {
            url.add_request_parameters(encoding.params());
            encoding.clear();
        }

        let requested = url.clone();
        let response = self.fetch_while_redirected(url, encoding).await?;

        if response.is_challenge() {
            if let (Some(scheme), Some(realm)) = (response.authentication_scheme(), response.realm()) {
                debug!(url = %requested, scheme, realm, "Challenged");
                self.authenticator.add_realm(&requested, AuthScheme::parse(scheme), realm);
            }
        }
        Ok(response)
    }

    async fn fetch_while_redirected(
        &mut self,
        mut url: Url,
        mut encoding: Encoding,
    ) -> Result<HttpResponse, FetchError> {
        let mut redirects = 0usize;
        loop {
            let response = self.fetch(&url, &encoding).await?;

            if self.config.cookies_enabled {
                self.cookie_jar.write_cookies(response.headers().cookies(), &url);
            }
            if !response.is_redirect() {
                return Ok(response);
            }

            let location = response.location().unwrap_or_default();
            let next = match url.make_absolute(location) {
                Ok(next) => next,
                Err(e) => {
                    warn!(url = %url, location, error = %e, "Unresolvable redirect");
                    return Ok(response);
                }
            };

            redirects += 1;
            if redirects > self.config.max_redirects {
                debug!(url = %url, redirects, "Redirect limit reached");
                return Ok(response);
            }
            debug!(from = %url, to = %next, status = response.response_code(), "Following redirect");
            url = next;
            encoding = Encoding::get();
        }
    }

    /// One request, no redirect handling.
    pub async fn fetch(&self, url: &Url, encoding: &Encoding) -> Result<HttpResponse, FetchError> {
        let request = self.create_request(url, encoding);
        request.fetch(&self.config.connect_options()).await
    }

    /// Request for `url` carrying caller headers, auth and cookies.
    pub fn create_request(&self, url: &Url, encoding: &Encoding) -> HttpRequest {
        let route = Route::for_url(url.clone(), self.config.proxy.as_ref());
        let mut request = HttpRequest::new(route, encoding.clone());
        for (name, value) in &self.config.headers {
            request.add_header_line(format!("{}: {}", name, value.evaluate()));
        }
        if self.config.cookies_enabled {
            request.read_cookies_from_jar(&self.cookie_jar, url);
        }
        self.authenticator.add_headers(&mut request, url);
        request
    }
}
