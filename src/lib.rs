//! # agentnet
//!
//! An embeddable HTTP/1.0 user agent for Rust.
//!
//! `agentnet` fetches pages the way a small scripted browser would: it keeps
//! a cookie jar across requests, answers Basic-auth realms it has been
//! given identities for, follows redirects up to a bound, and can route
//! through a forward proxy. `file://` URLs are served from disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agentnet::http::Encoding;
//! use agentnet::urlrequest::UserAgent;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut agent = UserAgent::new();
//!     agent.add_header("User-Agent", "agentnet/0.1");
//!     let url = Url::parse("http://example.com/").unwrap();
//!     match agent.fetch_response(url, Encoding::get()).await {
//!         Ok(response) => println!("{} {}", response.response_code(), response.text()),
//!         Err(e) => eprintln!("fetch failed: {}", e),
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and URL helpers
//! - [`cookies`] - Cookie parsing, the jar and its persistent stores
//! - [`http`] - Request writing, response parsing and authentication
//! - [`socket`] - TCP, TLS and file transports, direct and proxy routes
//! - [`urlrequest`] - The user agent and its configuration

pub mod base;
pub mod cookies;
pub mod http;
pub mod socket;
pub mod urlrequest;
