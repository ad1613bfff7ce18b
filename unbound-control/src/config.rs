//! Connection configuration for the control client.
//!
//! Everything here is plain data and deserialisable, so an embedding
//! application can keep the control settings in its own configuration file:
//!
//! ```ron
//! (
//!     target: Tcp(
//!         host: "localhost",
//!         port: 8953,
//!         tls: (
//!             cert: "/etc/unbound/unbound_control.pem",
//!             key: "/etc/unbound/unbound_control.key",
//!             ca: Some("/etc/unbound/unbound_server.pem"),
//!             server_name: Some("unbound"),
//!         ),
//!     ),
//!     timeouts: (connect_ms: Some(5000), response_ms: None),
//! )
//! ```

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Default host for TCP control connections
pub const DEFAULT_HOST: &str = "localhost";

/// Default port of the Unbound remote control interface
pub const DEFAULT_PORT: u16 = 8953;

/// Where the control interface lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// A Unix domain stream socket (`control-interface: /path/to/unbound.ctl`)
    Unix {
        /// Filesystem path of the socket
        path: PathBuf,
    },

    /// TCP upgraded to TLS with client certificate authentication
    Tcp {
        /// Host name or address
        #[serde(default = "defaults::host")]
        host: String,
        /// Port, usually 8953
        #[serde(default = "defaults::port")]
        port: u16,
        /// Client certificate material
        tls: TlsConfig,
    },
}

impl Target {
    /// A Unix socket target
    #[must_use]
    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    /// A TLS-over-TCP target
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16, tls: TlsConfig) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
            tls,
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unix { path } => write!(f, "unix:{}", path.display()),
            Self::Tcp { host, port, .. } => write!(f, "tls:{host}:{port}"),
        }
    }
}

/// TLS material for the TCP transport.
///
/// The client always presents `cert`/`key`. When `ca` is set the server
/// certificate must chain to it, otherwise the connection is refused.
///
/// **SECURITY WARNING**: without `ca` the server certificate is not verified
/// at all. This mirrors what `unbound-control` setups commonly rely on, but
/// it leaves the connection open to a man-in-the-middle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// PEM client certificate (`unbound_control.pem`)
    pub cert: PathBuf,

    /// PEM client private key (`unbound_control.key`)
    pub key: PathBuf,

    /// PEM CA bundle used to verify the server (`unbound_server.pem`)
    #[serde(default)]
    pub ca: Option<PathBuf>,

    /// Name to verify the server certificate against.
    ///
    /// Defaults to the connection host. Certificates generated by
    /// `unbound-control-setup` are issued for `unbound`.
    #[serde(default)]
    pub server_name: Option<String>,
}

impl TlsConfig {
    /// Client certificate and key, no server verification
    #[must_use]
    pub fn new(cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        Self {
            cert: cert.into(),
            key: key.into(),
            ca: None,
            server_name: None,
        }
    }

    /// Verify the server against the given CA bundle
    #[must_use]
    pub fn with_ca(mut self, ca: impl Into<PathBuf>) -> Self {
        self.ca = Some(ca.into());
        self
    }

    /// Verify the server certificate against `name` instead of the host
    #[must_use]
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Returns `true` if the server certificate will be verified.
    #[must_use]
    pub const fn verifies_server(&self) -> bool {
        self.ca.is_some()
    }
}

/// Deadlines around the network phases of an exchange.
///
/// `None` disables the deadline: a hung daemon then hangs the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Deadline for opening the socket and completing the TLS handshake.
    ///
    /// Default: 10 seconds
    #[serde(default = "defaults::connect_ms")]
    pub connect_ms: Option<u64>,

    /// Deadline for sending the command and reading the full reply.
    ///
    /// Default: none, since replies such as `dump_cache` can be large
    #[serde(default)]
    pub response_ms: Option<u64>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_ms: defaults::connect_ms(),
            response_ms: None,
        }
    }
}

impl Timeouts {
    /// No deadlines at all
    #[must_use]
    pub const fn none() -> Self {
        Self {
            connect_ms: None,
            response_ms: None,
        }
    }

    /// Set the connect deadline
    #[must_use]
    pub fn with_connect(mut self, timeout: Duration) -> Self {
        self.connect_ms = Some(duration_ms(timeout));
        self
    }

    /// Set the response deadline
    #[must_use]
    pub fn with_response(mut self, timeout: Duration) -> Self {
        self.response_ms = Some(duration_ms(timeout));
        self
    }

    /// Connect deadline, if any
    #[must_use]
    pub const fn connect(&self) -> Option<Duration> {
        match self.connect_ms {
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        }
    }

    /// Response deadline, if any
    #[must_use]
    pub const fn response(&self) -> Option<Duration> {
        match self.response_ms {
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Control interface to talk to
    pub target: Target,

    /// Network deadlines
    #[serde(default)]
    pub timeouts: Timeouts,
}

impl ClientConfig {
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            target,
            timeouts: Timeouts::default(),
        }
    }
}

mod defaults {
    pub fn host() -> String {
        super::DEFAULT_HOST.to_string()
    }

    pub const fn port() -> u16 {
        super::DEFAULT_PORT
    }

    #[allow(clippy::unnecessary_wraps)]
    pub const fn connect_ms() -> Option<u64> {
        Some(10_000)
    }
}
