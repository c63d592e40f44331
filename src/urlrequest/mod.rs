//! High-level fetching.
//!
//! - [`context`]: agent configuration and caller headers
//! - [`agent`]: the redirect-following [`UserAgent`]

pub mod agent;
pub mod context;

pub use agent::UserAgent;
pub use context::{HeaderValue, UserAgentConfig};
