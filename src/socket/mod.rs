//! Sockets, transports and routing.
//!
//! - [`connectjob`]: DNS → TCP → TLS connection flow with timeouts
//! - [`client`]: TCP, TLS and file byte sources
//! - [`transport`]: sticky-error read/write over one source
//! - [`tls`]: TLS configuration with BoringSSL
//! - [`proxy`]: forward HTTP proxy settings
//! - [`route`]: direct or proxied request lines

pub mod client;
pub mod connectjob;
pub mod proxy;
pub mod route;
pub mod tls;
pub mod transport;
