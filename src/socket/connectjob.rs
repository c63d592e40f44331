use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::tls::TlsConfig;
use boring::ssl::{SslConnector, SslMethod};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// Default read chunk for network transports.
pub const SOCKET_BLOCK_SIZE: usize = 255;
/// Default read chunk for file transports.
pub const FILE_BLOCK_SIZE: usize = 1024;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-connection settings handed down from the user agent.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Bounds the connect (DNS, TCP and TLS together) and each later read
    /// or write.
    pub timeout: Duration,
    pub tls: TlsConfig,
    /// Network read chunk size.
    pub block_size: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self { timeout: DEFAULT_CONNECT_TIMEOUT, tls: TlsConfig::default(), block_size: SOCKET_BLOCK_SIZE }
    }
}

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob;

impl ConnectJob {
    /// Open a socket to `host:port`, wrapping it in TLS when `scheme` is
    /// `https`.
    pub async fn connect(
        scheme: &str,
        host: &str,
        port: u16,
        options: &ConnectOptions,
    ) -> Result<SocketType, NetError> {
        debug!(scheme, host, port, "Connecting");
        match tokio::time::timeout(options.timeout, Self::connect_inner(scheme, host, port, options))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(NetError::ConnectionTimedOut {
                host: host.to_string(),
                port,
                timeout_secs: options.timeout.as_secs(),
            }),
        }
    }

    async fn connect_inner(
        scheme: &str,
        host: &str,
        port: u16,
        options: &ConnectOptions,
    ) -> Result<SocketType, NetError> {
        let stream = Self::connect_tcp(host, port).await?;
        if scheme.eq_ignore_ascii_case("https") {
            let tls = Self::handshake(host, stream, &options.tls).await?;
            Ok(SocketType::Ssl(tls))
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }

    async fn connect_tcp(host: &str, port: u16) -> Result<TcpStream, NetError> {
        let bare_host = host.trim_start_matches('[').trim_end_matches(']');
        let addrs: Vec<_> = tokio::net::lookup_host((bare_host, port)).await.dns_context(host)?.collect();
        if addrs.is_empty() {
            return Err(NetError::NameNotResolved {
                host: host.to_string(),
                reason: "no addresses".to_string(),
            });
        }

        let mut last_error = None;
        for addr in addrs {
            trace!(%addr, "Trying address");
            match TcpStream::connect(addr).await {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        let err = last_error.unwrap_or_else(|| std::io::Error::other("no address connected"));
        Err::<TcpStream, _>(err).connection_context(host, port)
    }

    async fn handshake(
        host: &str,
        stream: TcpStream,
        tls: &TlsConfig,
    ) -> Result<tokio_boring::SslStream<TcpStream>, NetError> {
        let mut builder = SslConnector::builder(SslMethod::tls())
            .map_err(|e| NetError::SslProtocolError { reason: e.to_string() })?;
        tls.apply_to_builder(&mut builder)?;

        let connector = builder.build();
        let mut config =
            connector.configure().map_err(|e| NetError::SslProtocolError { reason: e.to_string() })?;
        if !TlsConfig::should_set_sni(host) {
            config.set_use_server_name_indication(false);
        }
        if !tls.verify_peer {
            config.set_verify_hostname(false);
        }

        let server_name = host.trim_start_matches('[').trim_end_matches(']');
        tokio_boring::connect(config, server_name, stream).await.map_err(|e| {
            NetError::SslHandshakeFailed { host: host.to_string(), reason: e.to_string() }
        })
    }
}
