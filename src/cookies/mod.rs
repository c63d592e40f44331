//! Cookie management.
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`Cookie`](cookie::Cookie) | One cookie, `Set-Cookie` parsing and formatting |
//! | [`CookieJar`](jar::CookieJar) | Ordered jar with longest-path lookup |
//! | [`CookieStore`](persistence::CookieStore) | Session persistence (JSON, SQLite, memory) |
//! | [`truncate_host`](tld::truncate_host) | Host suffix cookies are keyed on |
//!
//! # Persisted jar
//!
//! ```rust,no_run
//! use agentnet::cookies::jar::CookieJar;
//! use agentnet::cookies::persistence::JsonCookieStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(JsonCookieStore::new("/var/lib/agent/sessions"));
//! let mut jar = CookieJar::with_store("crawler-1", store);
//! jar.set("lang", "en", Some("www.example.com"), "/", None);
//! // written to /var/lib/agent/sessions/crawler-1.sess
//! ```

pub mod cookie;
pub mod jar;
pub mod persistence;
pub mod tld;

pub use cookie::Cookie;
pub use jar::CookieJar;
