//! Error types for control operations

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during control operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// Establishing the socket or the TLS session failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Writing the command or reading the reply failed mid-exchange
    #[error("Command error: {0}")]
    Command(String),

    /// The reply was malformed, or a caller supplied argument was rejected
    #[error("Parse error: {0}")]
    Parse(String),

    /// The daemon does not know the command
    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),

    /// A configured deadline expired
    #[error("Timed out after {elapsed:?} while {during}")]
    Timeout {
        /// The deadline that expired
        elapsed: Duration,
        /// What the client was waiting for
        during: &'static str,
    },
}

impl ControlError {
    pub(crate) fn connection(err: impl std::fmt::Display) -> Self {
        Self::Connection(err.to_string())
    }

    pub(crate) fn command(err: impl std::fmt::Display) -> Self {
        Self::Command(err.to_string())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, ControlError>;
