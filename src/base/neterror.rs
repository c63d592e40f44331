use std::io;
use thiserror::Error;

/// Coarse grouping of [`NetError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetErrorKind {
    /// The connection or file could not be opened.
    TransportOpen,
    /// A read or write failed after the transport was opened.
    TransportIo,
    /// The peer closed the stream without sending anything.
    EmptyResponse,
    /// The response had no header/body separator.
    MalformedResponse,
    /// Content-Encoding could not be undone.
    Decompression,
    /// A URL could not be parsed or resolved.
    Url,
    /// The cookie store failed to load or save.
    CookieStore,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Transport open
    #[error("Name not resolved: {host} ({reason})")]
    NameNotResolved { host: String, reason: String },
    #[error("Connection to {host}:{port} failed: {reason}")]
    ConnectionFailed { host: String, port: u16, reason: String },
    #[error("Connection to {host}:{port} timed out after {timeout_secs}s")]
    ConnectionTimedOut { host: String, port: u16, timeout_secs: u64 },
    #[error("SSL handshake with {host} failed: {reason}")]
    SslHandshakeFailed { host: String, reason: String },
    #[error("SSL protocol error: {reason}")]
    SslProtocolError { reason: String },
    #[error("Cannot open [{path}]: {reason}")]
    FileOpenFailed { path: String, reason: String },
    #[error("Unknown URL scheme: {scheme}")]
    UnknownUrlScheme { scheme: String },

    // Transport I/O
    #[error("Cannot write to socket: {reason}")]
    WriteFailed { reason: String },
    #[error("Cannot read from socket: {reason}")]
    ReadFailed { reason: String },
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("Socket I/O timed out after {timeout_secs}s")]
    IoTimedOut { timeout_secs: u64 },

    // Response
    #[error("Nothing fetched")]
    EmptyResponse,
    #[error("Could not split headers from content")]
    MalformedResponse,
    #[error("Content decoding ({encoding}) failed: {reason}")]
    ContentDecodingFailed { encoding: String, reason: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Cookie store error: {message}")]
    CookieStore { message: String },
}

impl NetError {
    /// Chromium `net_error_list.h` code for this error. Codes from -900
    /// downwards are local to this crate.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::NameNotResolved { .. } => -105,
            NetError::ConnectionFailed { .. } => -104,
            NetError::ConnectionTimedOut { .. } => -118,
            NetError::SslHandshakeFailed { .. } => -107,
            NetError::SslProtocolError { .. } => -107,
            NetError::FileOpenFailed { .. } => -6,
            NetError::UnknownUrlScheme { .. } => -302,

            NetError::WriteFailed { .. } => -103,
            NetError::ReadFailed { .. } => -101,
            NetError::SocketNotConnected => -15,
            NetError::IoTimedOut { .. } => -7,

            NetError::EmptyResponse => -324,
            NetError::MalformedResponse => -320,
            NetError::ContentDecodingFailed { .. } => -330,

            NetError::InvalidUrl { .. } => -300,

            NetError::CookieStore { .. } => -903,
        }
    }

    pub fn kind(&self) -> NetErrorKind {
        match self {
            NetError::NameNotResolved { .. }
            | NetError::ConnectionFailed { .. }
            | NetError::ConnectionTimedOut { .. }
            | NetError::SslHandshakeFailed { .. }
            | NetError::SslProtocolError { .. }
            | NetError::FileOpenFailed { .. }
            | NetError::UnknownUrlScheme { .. } => NetErrorKind::TransportOpen,
            NetError::WriteFailed { .. }
            | NetError::ReadFailed { .. }
            | NetError::SocketNotConnected
            | NetError::IoTimedOut { .. } => NetErrorKind::TransportIo,
            NetError::EmptyResponse => NetErrorKind::EmptyResponse,
            NetError::MalformedResponse => NetErrorKind::MalformedResponse,
            NetError::ContentDecodingFailed { .. } => NetErrorKind::Decompression,
            NetError::InvalidUrl { .. } => NetErrorKind::Url,
            NetError::CookieStore { .. } => NetErrorKind::CookieStore,
        }
    }

    /// True for errors raised before any byte was exchanged.
    pub fn is_connect_error(&self) -> bool {
        self.kind() == NetErrorKind::TransportOpen
    }

    pub fn connection_failed_to(host: &str, port: u16, err: io::Error) -> Self {
        NetError::ConnectionFailed { host: host.to_string(), port, reason: err.to_string() }
    }

    pub fn dns_failed(host: &str, err: io::Error) -> Self {
        NetError::NameNotResolved { host: host.to_string(), reason: err.to_string() }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        NetError::InvalidUrl { url: url.into() }
    }

    pub fn cookie_store(message: impl std::fmt::Display) -> Self {
        NetError::CookieStore { message: message.to_string() }
    }
}
