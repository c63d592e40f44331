//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): every failure as a value, with
//!   Chromium-style numeric codes
//! - [`IoResultExt`](context::IoResultExt): context for `io::Error`
//! - [`UrlExt`](urlext::UrlExt): directory/page helpers over `url::Url`

pub mod context;
pub mod neterror;
pub mod urlext;
