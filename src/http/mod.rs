//! HTTP/1.0 request and response handling.
//!
//! - [`encoding`]: method, form parameters and raw bodies
//! - [`request`]: writes one request and reads the reply
//! - [`headers`]: response header block parsing
//! - [`decode`]: `Content-Encoding` decompression
//! - [`response`]: parsed responses and fetch errors
//! - [`authenticator`]: Basic-auth realms

pub mod authenticator;
pub mod decode;
pub mod encoding;
pub mod headers;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use authenticator::{AuthScheme, Authenticator};
pub use encoding::Encoding;
pub use headers::HeaderBlock;
pub use request::HttpRequest;
pub use response::{FetchError, HttpResponse};
