//! Client for the Unbound DNS resolver's remote control protocol
//!
//! The daemon listens on a Unix domain socket or on a TLS port (8953 by
//! default) that requires a client certificate. Each command is a single line
//! `UBCT1 <command> <args>` and the daemon replies with free text, closing the
//! connection when done. This crate handles:
//! - Connecting over either transport, with optional server verification
//! - Framing one command per connection and reading the reply to EOF
//! - Turning statistics, status and list replies into structured data
//! - Validating arguments before anything is sent

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod parser;
pub mod response;
pub mod session;
pub mod transport;

pub use client::UnboundControlClient;
pub use command::{Flags, ValidOption};
pub use config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT, Target, Timeouts, TlsConfig};
pub use error::{ControlError, Result};
pub use response::{Record, Response, ResponseData, Status, Value};
pub use session::PROTOCOL_HEADER;

/// Default path of the control socket when `control-interface` is a path
pub const DEFAULT_CONTROL_SOCKET: &str = "/run/unbound.ctl";
