//! Mock Unbound control daemon for testing
//!
//! Accepts connections on a Unix socket or a TLS port, records every request
//! and answers with a canned reply before closing its side, like the real
//! daemon does.
#![allow(dead_code)] // Test utility module - not all methods used in every test
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() {
//! let daemon = MockDaemon::builder()
//!     .with_reply("ok\n")
//!     .unix(&dir.path().join("unbound.ctl"));
//!
//! let client = UnboundControlClient::unix(daemon.socket_path().unwrap());
//! client.reload().await.unwrap();
//! assert_eq!(daemon.requests().await, vec!["UBCT1 reload\n"]);
//! # }
//! ```

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::{TcpListener, UnixListener},
    sync::{Notify, RwLock},
    task::JoinHandle,
};
use tokio_rustls::{TlsAcceptor, rustls::ServerConfig};

/// Terminates a bulk payload
const END_OF_INPUT: &[u8] = b"\x04\n";

#[derive(Clone)]
struct MockDaemonConfig {
    reply: String,
    expect_payload: bool,
    response_delay: Option<Duration>,
    hang: bool,
}

impl Default for MockDaemonConfig {
    fn default() -> Self {
        Self {
            reply: "ok\n".to_string(),
            expect_payload: false,
            response_delay: None,
            hang: false,
        }
    }
}

#[derive(Default)]
struct Observed {
    requests: RwLock<Vec<String>>,
    received: Notify,
    connections: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

pub struct MockDaemon {
    socket_path: Option<PathBuf>,
    addr: Option<SocketAddr>,
    observed: Arc<Observed>,
    task: JoinHandle<()>,
}

impl MockDaemon {
    #[must_use]
    pub fn builder() -> MockDaemonBuilder {
        MockDaemonBuilder {
            config: MockDaemonConfig::default(),
        }
    }

    pub fn socket_path(&self) -> Option<&Path> {
        self.socket_path.as_deref()
    }

    pub const fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    /// Every request received so far, header line and payload included
    pub async fn requests(&self) -> Vec<String> {
        self.observed.requests.read().await.clone()
    }

    /// Wait until the next request has been recorded
    pub async fn request_received(&self) {
        self.observed.received.notified().await;
    }

    pub fn connections(&self) -> usize {
        self.observed.connections.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were awaiting a reply at the same time
    pub fn max_concurrent(&self) -> usize {
        self.observed.max_active.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }

    async fn handle<S>(stream: S, config: Arc<MockDaemonConfig>, observed: Arc<Observed>)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if let Err(e) = Self::exchange(stream, &config, &observed).await {
            tracing::debug!("Mock daemon connection failed: {e}");
        }
    }

    async fn exchange<S>(
        stream: S,
        config: &MockDaemonConfig,
        observed: &Observed,
    ) -> std::io::Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut stream = BufReader::new(stream);
        let mut request = Vec::new();
        stream.read_until(b'\n', &mut request).await?;

        if config.expect_payload {
            while !request.ends_with(END_OF_INPUT) {
                if stream.read_until(b'\n', &mut request).await? == 0 {
                    break;
                }
            }
        }

        tracing::debug!("Mock daemon received: {}", String::from_utf8_lossy(&request).trim());
        observed
            .requests
            .write()
            .await
            .push(String::from_utf8_lossy(&request).into_owned());
        observed.received.notify_one();

        // A request is outstanding until its reply is written
        let active = observed.active.fetch_add(1, Ordering::SeqCst) + 1;
        observed.max_active.fetch_max(active, Ordering::SeqCst);

        if config.hang {
            // Hold the connection open until the client gives up
            let mut rest = Vec::new();
            let _ = tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut rest).await;
            return Ok(());
        }

        if let Some(delay) = config.response_delay {
            tokio::time::sleep(delay).await;
        }
        observed.active.fetch_sub(1, Ordering::SeqCst);

        let stream = stream.get_mut();
        stream.write_all(config.reply.as_bytes()).await?;
        stream.shutdown().await
    }
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Builder for configuring a `MockDaemon`
pub struct MockDaemonBuilder {
    config: MockDaemonConfig,
}

impl MockDaemonBuilder {
    /// Text sent back for every request
    #[must_use]
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.config.reply = reply.into();
        self
    }

    /// Keep reading after the command line until the end-of-input marker
    #[must_use]
    pub const fn with_payload(mut self) -> Self {
        self.config.expect_payload = true;
        self
    }

    #[must_use]
    pub const fn with_response_delay(mut self, delay: Duration) -> Self {
        self.config.response_delay = Some(delay);
        self
    }

    /// Never reply
    #[must_use]
    pub const fn hanging(mut self) -> Self {
        self.config.hang = true;
        self
    }

    /// Listen on a Unix domain socket at `path`
    pub fn unix(self, path: &Path) -> MockDaemon {
        let listener = UnixListener::bind(path).expect("Failed to bind control socket");
        let config = Arc::new(self.config);
        let observed = Arc::new(Observed::default());

        let task = {
            let observed = Arc::clone(&observed);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    observed.connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(MockDaemon::handle(
                        stream,
                        Arc::clone(&config),
                        Arc::clone(&observed),
                    ));
                }
            })
        };

        MockDaemon {
            socket_path: Some(path.to_path_buf()),
            addr: None,
            observed,
            task,
        }
    }

    /// Listen for TLS connections on an ephemeral localhost port
    pub async fn tls(self, server_config: Arc<ServerConfig>) -> MockDaemon {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind control port");
        let addr = listener.local_addr().expect("Failed to get local address");
        let acceptor = TlsAcceptor::from(server_config);
        let config = Arc::new(self.config);
        let observed = Arc::new(Observed::default());

        let task = {
            let observed = Arc::clone(&observed);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    observed.connections.fetch_add(1, Ordering::SeqCst);
                    let acceptor = acceptor.clone();
                    let config = Arc::clone(&config);
                    let observed = Arc::clone(&observed);
                    tokio::spawn(async move {
                        match acceptor.accept(stream).await {
                            Ok(stream) => MockDaemon::handle(stream, config, observed).await,
                            Err(e) => tracing::debug!("Mock daemon handshake failed: {e}"),
                        }
                    });
                }
            })
        };

        MockDaemon {
            socket_path: None,
            addr: Some(addr),
            observed,
            task,
        }
    }
}
