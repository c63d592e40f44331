//! Ergonomic error context helpers.
//!
//! Extension traits that turn `io::Error` values into context-rich
//! `NetError` variants.

use crate::base::neterror::NetError;
use std::io;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add connection context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use agentnet::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("example.com", 443)?;
    /// // Error: "Connection to example.com:443 failed: connection refused"
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Add DNS resolution context to an IO error.
    fn dns_context(self, host: &str) -> Result<T, NetError>;

    /// Add file context to an IO error.
    fn file_context(self, path: &str) -> Result<T, NetError>;

    /// Map a failed socket write.
    fn write_context(self) -> Result<T, NetError>;

    /// Map a failed socket read.
    fn read_context(self) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn dns_context(self, host: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(host, e))
    }

    fn file_context(self, path: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::FileOpenFailed { path: path.to_string(), reason: e.to_string() })
    }

    fn write_context(self) -> Result<T, NetError> {
        self.map_err(|e| NetError::WriteFailed { reason: e.to_string() })
    }

    fn read_context(self) -> Result<T, NetError> {
        self.map_err(|e| NetError::ReadFailed { reason: e.to_string() })
    }
}
