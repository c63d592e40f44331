use crate::base::neterror::NetError;
use crate::cookies::cookie::Cookie;
use crate::cookies::persistence::{CookieStore, PersistentCookie};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, warn};
use url::Url;

/// Ordered cookie list with optional per-session persistence.
///
/// At most one cookie is kept per (host, path, name) match; setting a
/// matching cookie overwrites it in place. When the jar has a session id
/// and a store, every mutation is written back. Persistence failures are
/// logged and never abort the caller.
#[derive(Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
    session: Option<String>,
    store: Option<Arc<dyn CookieStore>>,
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieJar")
            .field("cookies", &self.cookies)
            .field("session", &self.session)
            .field("store", &self.store.is_some())
            .finish()
    }
}

impl CookieJar {
    /// In-memory jar without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jar bound to `session` in `store`, loaded from whatever was saved.
    pub fn with_store(session: impl Into<String>, store: Arc<dyn CookieStore>) -> Self {
        let mut jar = Self { cookies: Vec::new(), session: Some(session.into()), store: Some(store) };
        jar.load();
        jar
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Insert or overwrite, then persist.
    pub fn set_cookie(&mut self, cookie: Cookie) {
        self.insert(cookie);
        self.save();
    }

    /// Build a cookie and insert it. `host` is truncated before storing;
    /// a host that cannot be truncated leaves the cookie host-less.
    pub fn set(
        &mut self,
        name: &str,
        value: &str,
        host: Option<&str>,
        path: &str,
        expiry: Option<OffsetDateTime>,
    ) {
        let mut cookie = Cookie::new(name, value, path, expiry);
        if let Some(host) = host.filter(|h| !h.is_empty()) {
            cookie.set_host(host);
        }
        self.set_cookie(cookie);
    }

    fn insert(&mut self, cookie: Cookie) {
        match self.find_first_match(&cookie) {
            Some(idx) => self.cookies[idx] = cookie,
            None => self.cookies.push(cookie),
        }
    }

    fn find_first_match(&self, candidate: &Cookie) -> Option<usize> {
        self.cookies.iter().position(|stored| {
            Self::is_match(candidate, stored.host(), stored.path(), stored.name())
        })
    }

    /// Host is only compared when both sides have one; `cookie`'s path must
    /// prefix `path`.
    fn is_match(cookie: &Cookie, host: Option<&str>, path: &str, name: &str) -> bool {
        if cookie.name() != name {
            return false;
        }
        if let (Some(host), Some(_)) = (host.filter(|h| !h.is_empty()), cookie.host()) {
            if !cookie.is_valid_host(host) {
                return false;
            }
        }
        cookie.is_valid_path(path)
    }

    /// Value of the most specific matching cookie. Among matches the longest
    /// stored path wins, earliest first on ties.
    pub fn get_cookie_value(&self, host: &str, path: &str, name: &str) -> Option<&str> {
        let mut best: Option<&Cookie> = None;
        for cookie in &self.cookies {
            if !Self::is_match(cookie, Some(host), path, name) {
                continue;
            }
            if best.map_or(true, |b| cookie.path().len() > b.path().len()) {
                best = Some(cookie);
            }
        }
        best.map(Cookie::value)
    }

    /// `name=value` pairs for every cookie in scope for `url`.
    pub fn select_as_pairs(&self, url: &Url) -> Vec<String> {
        self.cookies
            .iter()
            .filter(|c| Self::is_match(c, url.host_str(), url.path(), c.name()))
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect()
    }

    /// Store response cookies under `url`'s host, then persist once.
    pub fn write_cookies(&mut self, cookies: &[Cookie], url: &Url) {
        if cookies.is_empty() {
            return;
        }
        for cookie in cookies {
            let mut cookie = cookie.clone();
            if let Some(host) = url.host_str() {
                cookie.set_host(host);
            }
            debug!(name = cookie.name(), host = ?cookie.host(), path = cookie.path(), "Storing cookie");
            self.insert(cookie);
        }
        self.save();
    }

    /// Start a new browser session: drop cleared cookies, session cookies
    /// and, when `reference` is given, cookies expired as of that time.
    pub fn restart_session(&mut self, reference: Option<OffsetDateTime>) {
        self.cookies.retain(|c| {
            if c.value().is_empty() || c.is_session() {
                return false;
            }
            !reference.is_some_and(|now| c.is_expired(now))
        });
        self.save();
    }

    /// Shift every expiry `seconds` into the past.
    pub fn age_prematurely(&mut self, seconds: i64) {
        for cookie in &mut self.cookies {
            cookie.age_prematurely(seconds);
        }
        self.save();
    }

    /// Write the jar to its store. No-op without a session.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            warn!(session = ?self.session, error = %e, "Failed to save cookies");
        }
    }

    pub fn try_save(&self) -> Result<(), NetError> {
        let (Some(session), Some(store)) = (&self.session, &self.store) else {
            return Ok(());
        };
        let records: Vec<PersistentCookie> = self.cookies.iter().map(PersistentCookie::from).collect();
        store.save(session, &records)
    }

    /// Merge saved cookies into the jar. Failures leave the jar as it was.
    pub fn load(&mut self) {
        let (Some(session), Some(store)) = (&self.session, &self.store) else {
            return;
        };
        match store.load(session) {
            Ok(records) => {
                debug!(session = %session, count = records.len(), "Loaded cookies");
                for record in records {
                    self.insert(record.into_cookie());
                }
            }
            Err(e) => warn!(session = %session, error = %e, "Failed to load cookies"),
        }
    }
}
