//! Sticky-error byte transport.
//!
//! A [`Transport`] wraps one [`SocketType`] for a single request/response
//! exchange. The first failed or timed-out read or write is remembered: the
//! socket is released and every later call returns that same error without
//! touching the network.

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::connectjob::{ConnectJob, ConnectOptions, FILE_BLOCK_SIZE};
use bytes::Bytes;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};
use url::Url;

#[derive(Debug)]
pub struct Transport {
    socket: Option<SocketType>,
    /// `host:port` or file path, for logs.
    peer: String,
    sent: Vec<u8>,
    error: Option<NetError>,
    block_size: usize,
    io_timeout: Duration,
}

impl Transport {
    /// Connect over TCP, or TLS for `https`.
    pub async fn connect(
        scheme: &str,
        host: &str,
        port: u16,
        options: &ConnectOptions,
    ) -> Result<Self, NetError> {
        let socket = ConnectJob::connect(scheme, host, port, options).await?;
        debug!(host, port, kind = socket.kind(), "Transport open");
        Ok(Self::from_socket(socket, format!("{}:{}", host, port), options.block_size, options.timeout))
    }

    /// Open the local file named by a `file://` URL.
    pub async fn open_file(url: &Url, options: &ConnectOptions) -> Result<Self, NetError> {
        let path = url.to_file_path().map_err(|_| NetError::invalid_url(url.as_str()))?;
        let path_str = path.display().to_string();
        let file = tokio::fs::File::open(&path).await.file_context(&path_str)?;
        debug!(path = %path_str, "Opened file transport");
        Ok(Self::from_socket(SocketType::File(file), path_str, FILE_BLOCK_SIZE, options.timeout))
    }

    pub fn from_socket(
        socket: SocketType,
        peer: impl Into<String>,
        block_size: usize,
        io_timeout: Duration,
    ) -> Self {
        Self {
            socket: Some(socket),
            peer: peer.into(),
            sent: Vec::new(),
            error: None,
            block_size: block_size.max(1),
            io_timeout,
        }
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    pub fn is_file(&self) -> bool {
        self.socket.as_ref().is_some_and(SocketType::is_file)
    }

    pub fn error(&self) -> Option<&NetError> {
        self.error.as_ref()
    }

    /// Every byte written so far.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    fn socket(&mut self) -> Result<&mut SocketType, NetError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.socket.as_mut().ok_or(NetError::SocketNotConnected)
    }

    fn fail(&mut self, err: NetError) -> NetError {
        warn!(peer = %self.peer, error = %err, "Transport failed");
        self.socket = None;
        self.error = Some(err.clone());
        err
    }

    fn timed_out(&self) -> NetError {
        NetError::IoTimedOut { timeout_secs: self.io_timeout.as_secs() }
    }

    /// Write and flush `bytes`. Writes to file transports are dropped.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), NetError> {
        let io_timeout = self.io_timeout;
        let socket = self.socket()?;
        if socket.is_file() {
            return Ok(());
        }

        let result = tokio::time::timeout(io_timeout, async {
            socket.write_all(bytes).await?;
            socket.flush().await
        })
        .await;

        match result {
            Ok(written) => match written.write_context() {
                Ok(()) => {
                    self.sent.extend_from_slice(bytes);
                    Ok(())
                }
                Err(e) => Err(self.fail(e)),
            },
            Err(_) => {
                let err = self.timed_out();
                Err(self.fail(err))
            }
        }
    }

    /// Read up to one block. An empty chunk means end of stream.
    pub async fn read(&mut self) -> Result<Bytes, NetError> {
        let io_timeout = self.io_timeout;
        let mut buf = vec![0u8; self.block_size];
        let socket = self.socket()?;

        match tokio::time::timeout(io_timeout, socket.read(&mut buf)).await {
            Ok(read) => match read.read_context() {
                Ok(n) => {
                    buf.truncate(n);
                    Ok(Bytes::from(buf))
                }
                Err(e) => Err(self.fail(e)),
            },
            Err(_) => {
                let err = self.timed_out();
                Err(self.fail(err))
            }
        }
    }

    /// Release the socket. Later reads and writes fail with
    /// `SocketNotConnected` unless an earlier error is already stored.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            debug!(peer = %self.peer, sent = self.sent.len(), "Closed transport");
        }
    }
}
