//! Basic-auth realms.
//!
//! A realm is registered when a server challenges with
//! `WWW-Authenticate: <scheme> realm="<name>"`. Its root is the directory of
//! the challenged URL and widens to the common prefix of every URL later
//! challenged under the same name. Once an identity is set, requests inside
//! the root carry `Authorization: Basic ...`.

use crate::base::urlext::UrlExt;
use crate::http::request::HttpRequest;
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

/// Authentication scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// Basic authentication (base64 encoded)
    Basic,
    /// Digest authentication (challenge-response)
    Digest,
    /// NTLM/Negotiate (Windows integrated auth)
    Ntlm,
    Other(String),
}

impl AuthScheme {
    /// Scheme token from a `WWW-Authenticate` header, case-insensitive.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "basic" => AuthScheme::Basic,
            "digest" => AuthScheme::Digest,
            "ntlm" | "negotiate" => AuthScheme::Ntlm,
            _ => AuthScheme::Other(token.trim().to_string()),
        }
    }
}

/// One protection scope on a host.
#[derive(Clone)]
pub struct Realm {
    scheme: AuthScheme,
    root: String,
    username: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl fmt::Debug for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realm")
            .field("scheme", &self.scheme)
            .field("root", &self.root)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Realm {
    /// Realm rooted at the directory of `url`.
    pub fn new(scheme: AuthScheme, url: &Url) -> Self {
        Self { scheme, root: url.base_path(), username: None, password: None }
    }

    pub fn scheme(&self) -> &AuthScheme {
        &self.scheme
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_ref().map(|p| p.as_str())
    }

    /// Widen the root so it also covers `url`'s directory.
    pub fn stretch(&mut self, url: &Url) {
        self.root = common_path(&self.root, &url.base_path());
    }

    pub fn set_identity(&mut self, username: &str, password: &str) {
        self.username = Some(username.to_string());
        self.password = Some(Zeroizing::new(password.to_string()));
    }

    /// True when `url`'s directory, or the page treated as a directory, is
    /// under the root.
    pub fn is_within(&self, url: &Url) -> bool {
        let base = url.base_path();
        if base.starts_with(&self.root) {
            return true;
        }
        format!("{}{}/", base, url.page()).starts_with(&self.root)
    }
}

/// Realms per host, in the order they were first challenged.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    realms: HashMap<String, Vec<(String, Realm)>>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every realm.
    pub fn restart_session(&mut self) {
        self.realms.clear();
    }

    /// Register `name` on `url`'s host, or widen it if already known.
    pub fn add_realm(&mut self, url: &Url, scheme: AuthScheme, name: &str) {
        let Some(host) = url.host_str() else {
            return;
        };
        let realms = self.realms.entry(host.to_string()).or_default();
        match realms.iter_mut().find(|(n, _)| n == name) {
            Some((_, realm)) => realm.stretch(url),
            None => realms.push((name.to_string(), Realm::new(scheme, url))),
        }
        debug!(host, realm = name, "Registered realm");
    }

    /// Ignored for realms that were never registered.
    pub fn set_identity_for_realm(&mut self, host: &str, name: &str, username: &str, password: &str) {
        let realm = self
            .realms
            .get_mut(host)
            .and_then(|realms| realms.iter_mut().find(|(n, _)| n == name));
        if let Some((_, realm)) = realm {
            realm.set_identity(username, password);
        }
    }

    pub fn realm(&self, host: &str, name: &str) -> Option<&Realm> {
        self.realms.get(host)?.iter().find(|(n, _)| n == name).map(|(_, realm)| realm)
    }

    /// Most specific realm covering `url`. Equal roots go to the realm
    /// registered first.
    pub fn find_realm(&self, url: &Url) -> Option<&Realm> {
        let mut best: Option<&Realm> = None;
        for (_, realm) in self.realms.get(url.host_str()?)? {
            if !realm.is_within(url) {
                continue;
            }
            if best.map_or(true, |b| realm.root.len() > b.root.len()) {
                best = Some(realm);
            }
        }
        best
    }

    /// Add `Authorization` to `request`. Credentials in the URL win over
    /// any realm identity.
    pub fn add_headers(&self, request: &mut HttpRequest, url: &Url) {
        if let Some((username, password)) = url.credentials() {
            add_basic_header(request, &username, &password);
            return;
        }
        let Some(realm) = self.find_realm(url) else {
            return;
        };
        if realm.scheme != AuthScheme::Basic {
            return;
        }
        if let (Some(username), Some(password)) = (realm.username(), realm.password()) {
            add_basic_header(request, username, password);
        }
    }
}

fn add_basic_header(request: &mut HttpRequest, username: &str, password: &str) {
    if let Some(value) = basic_header(username, password) {
        request.add_header_line(format!("Authorization: {}", value));
    }
}

/// `Basic <base64(user:pass)>`, when both parts are non-empty.
pub fn basic_header(username: &str, password: &str) -> Option<String> {
    if username.is_empty() || password.is_empty() {
        return None;
    }
    let creds = Zeroizing::new(format!("{}:{}", username, password));
    Some(format!("Basic {}", general_purpose::STANDARD.encode(creds.as_bytes())))
}

/// Longest shared run of whole `/`-separated components, ending in `/`.
pub fn common_path(first: &str, second: &str) -> String {
    let common: Vec<&str> = first
        .split('/')
        .zip(second.split('/'))
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect();
    let mut path = common.join("/");
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}
