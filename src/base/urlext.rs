//! URL helpers used by routing, cookies and authentication.
//!
//! `url::Url` already covers parsing and base-URL resolution. [`UrlExt`]
//! adds the directory/page split that cookie and realm scoping are built on.

use crate::base::neterror::NetError;
use percent_encoding::percent_decode_str;
use url::Url;

pub trait UrlExt {
    /// Directory part of the path, always ending in `/`.
    fn base_path(&self) -> String;

    /// Last path segment (the file name), empty for directory URLs.
    fn page(&self) -> String;

    /// `?query` or an empty string.
    fn encoded_request(&self) -> String;

    /// Path and query as sent in an origin-form request line.
    fn request_target(&self) -> String;

    /// Embedded `user:pass`, percent-decoded. `None` unless both are non-empty.
    fn credentials(&self) -> Option<(String, String)>;

    /// Resolve `location` against this URL.
    fn make_absolute(&self, location: &str) -> Result<Url, NetError>;

    /// Append form parameters to the query string.
    fn add_request_parameters(&mut self, params: &[(String, String)]);

    /// Drop the query string.
    fn clear_request(&mut self);
}

impl UrlExt for Url {
    fn base_path(&self) -> String {
        let path = self.path();
        match path.rfind('/') {
            Some(idx) => path[..=idx].to_string(),
            None => "/".to_string(),
        }
    }

    fn page(&self) -> String {
        let path = self.path();
        match path.rfind('/') {
            Some(idx) => path[idx + 1..].to_string(),
            None => path.to_string(),
        }
    }

    fn encoded_request(&self) -> String {
        match self.query() {
            Some(q) if !q.is_empty() => format!("?{}", q),
            _ => String::new(),
        }
    }

    fn request_target(&self) -> String {
        let path = if self.path().is_empty() { "/" } else { self.path() };
        format!("{}{}", path, self.encoded_request())
    }

    fn credentials(&self) -> Option<(String, String)> {
        let user = percent_decode_str(self.username()).decode_utf8_lossy().into_owned();
        let pass = percent_decode_str(self.password()?).decode_utf8_lossy().into_owned();
        if user.is_empty() || pass.is_empty() {
            return None;
        }
        Some((user, pass))
    }

    fn make_absolute(&self, location: &str) -> Result<Url, NetError> {
        self.join(location.trim()).map_err(|_| NetError::invalid_url(location))
    }

    fn add_request_parameters(&mut self, params: &[(String, String)]) {
        if params.is_empty() {
            return;
        }
        let mut pairs = self.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }

    fn clear_request(&mut self) {
        self.set_query(None);
    }
}
