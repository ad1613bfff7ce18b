//! Byte-stream transports for the control protocol.
//!
//! The daemon answers every command with a single reply and then closes its
//! side of the connection, so a transport only needs four primitives:
//! connect, write, read until EOF, and close.

mod tls;

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, UnixStream},
};
use tokio_rustls::{TlsConnector, client::TlsStream};
use tracing::{debug, trace};

use crate::{
    ControlError, Result,
    config::{Target, TlsConfig},
};

/// Initial capacity of the reply buffer.
const BUFFER_SIZE: usize = 8192;

/// An open connection to the control interface.
#[async_trait]
pub trait Transport: Send {
    /// Write all of `bytes` and flush.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Command`] if the write fails.
    async fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read until the peer closes its write side and decode the bytes as text.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Command`] on a read-side transport error.
    async fn read_to_close(&mut self) -> Result<String>;

    /// Shut the connection down. Calling this more than once is harmless.
    async fn close(&mut self);
}

/// Opens [`Transport`]s to a fixed target.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connection`] if the socket cannot be opened or
    /// the TLS handshake fails.
    async fn connect(&self) -> Result<Box<dyn Transport>>;
}

/// A real socket, either Unix domain or TLS over TCP.
pub enum Connection {
    Unix(UnixStream),
    Tls(Box<TlsStream<TcpStream>>),
    Closed,
}

impl Connection {
    /// Connect to a Unix domain socket.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connection`] if the socket cannot be opened.
    pub async fn unix(path: &Path) -> Result<Self> {
        debug!("Connecting to control socket: {}", path.display());
        let stream = UnixStream::connect(path)
            .await
            .map_err(ControlError::connection)?;
        Ok(Self::Unix(stream))
    }

    /// Connect over TCP and complete a TLS handshake.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connection`] if the certificate material cannot
    /// be loaded, the TCP connection fails, or the handshake (including server
    /// verification, when a CA is configured) fails.
    pub async fn tls(host: &str, port: u16, tls: &TlsConfig) -> Result<Self> {
        let config = tls::client_config(tls)?;
        let server_name = tls::server_name(tls, host)?;

        debug!("Connecting to control interface: {host}:{port}");
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(ControlError::connection)?;

        let connector = TlsConnector::from(Arc::new(config));
        let stream = connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ControlError::Connection(format!("TLS handshake failed: {e}")))?;

        debug!("TLS session established with {host}:{port}");
        Ok(Self::Tls(Box::new(stream)))
    }
}

#[async_trait]
impl Transport for Connection {
    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        trace!("Sending {} bytes", bytes.len());
        match self {
            Self::Unix(stream) => {
                stream.write_all(bytes).await.map_err(ControlError::command)?;
                stream.flush().await.map_err(ControlError::command)
            }
            Self::Tls(stream) => {
                stream.write_all(bytes).await.map_err(ControlError::command)?;
                stream.flush().await.map_err(ControlError::command)
            }
            Self::Closed => Err(ControlError::Command("Connection is closed".to_string())),
        }
    }

    async fn read_to_close(&mut self) -> Result<String> {
        let mut buffer = Vec::with_capacity(BUFFER_SIZE);

        let result = match self {
            Self::Unix(stream) => stream.read_to_end(&mut buffer).await,
            Self::Tls(stream) => stream.read_to_end(&mut buffer).await,
            Self::Closed => {
                return Err(ControlError::Command("Connection is closed".to_string()));
            }
        };

        match result {
            Ok(_) => {}
            // The daemon may drop the TCP connection without a close_notify;
            // everything before that point is still the complete reply.
            Err(e)
                if e.kind() == std::io::ErrorKind::UnexpectedEof
                    && matches!(self, Self::Tls(_)) =>
            {
                debug!("Peer closed the TLS session without close_notify");
            }
            Err(e) => return Err(ControlError::command(e)),
        }

        trace!("Received {} bytes", buffer.len());
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    async fn close(&mut self) {
        match std::mem::replace(self, Self::Closed) {
            Self::Unix(mut stream) => {
                let _ = stream.shutdown().await;
            }
            Self::Tls(mut stream) => {
                let _ = stream.shutdown().await;
            }
            Self::Closed => {}
        }
    }
}

/// Connects to a configured [`Target`].
#[derive(Debug, Clone)]
pub struct TargetConnector {
    target: Target,
}

impl TargetConnector {
    #[must_use]
    pub const fn new(target: Target) -> Self {
        Self { target }
    }

    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }
}

#[async_trait]
impl Connector for TargetConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>> {
        let connection = match &self.target {
            Target::Unix { path } => Connection::unix(path).await?,
            Target::Tcp { host, port, tls } => Connection::tls(host, *port, tls).await?,
        };
        Ok(Box::new(connection))
    }
}
