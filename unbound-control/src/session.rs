//! Session management for the control connection.
//!
//! A [`Session`] owns at most one open [`Transport`]. Each exchange consumes
//! the connection (the daemon closes it after replying), so every command
//! after the first reconnects. All access to the held handle goes through a
//! single async mutex: connects are single-flight and concurrent commands are
//! queued in arrival order instead of sharing a socket.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::{Mutex, Notify};
use tracing::{debug, trace};

use crate::{
    ControlError, Result,
    config::Timeouts,
    transport::{Connector, Transport},
};

/// Header that starts every request line
pub const PROTOCOL_HEADER: &str = "UBCT1";

/// Marks the end of a bulk payload, as `unbound-control` sends after stdin
pub const END_OF_INPUT: &str = "\x04\n";

/// One logical control connection.
pub struct Session {
    connector: Arc<dyn Connector>,
    handle: Mutex<Option<Box<dyn Transport>>>,
    abort: Notify,
    timeouts: Timeouts,
}

impl Session {
    /// Create a session that opens connections through `connector`
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>, timeouts: Timeouts) -> Self {
        Self {
            connector,
            handle: Mutex::new(None),
            abort: Notify::new(),
            timeouts,
        }
    }

    /// The deadlines applied by this session
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Open a connection now instead of on the next command.
    ///
    /// Does nothing if a connection is already held. Concurrent callers wait
    /// for the attempt in progress and share its result.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connection`] or [`ControlError::Timeout`] if
    /// the connection cannot be established.
    pub async fn connect(&self) -> Result<()> {
        let mut handle = self.handle.lock().await;
        if handle.is_none() {
            *handle = Some(self.open().await?);
        }
        Ok(())
    }

    /// Returns `true` if a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    /// Run one framed exchange and return the complete reply.
    ///
    /// `payload`, when given, is sent after the command line and terminated
    /// with [`END_OF_INPUT`]. The connection is closed afterwards whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// - [`ControlError::Connection`] if no connection could be opened
    /// - [`ControlError::Command`] if the write or read fails, or the
    ///   session was disconnected while waiting for the reply
    /// - [`ControlError::Timeout`] if a configured deadline expired
    pub async fn execute(&self, command: &str, payload: Option<&[String]>) -> Result<String> {
        let mut handle = self.handle.lock().await;

        // Registered before any I/O so a disconnect() issued from now on
        // cannot be missed.
        let aborted = self.abort.notified();
        tokio::pin!(aborted);
        aborted.as_mut().enable();

        let mut transport = match handle.take() {
            Some(transport) => transport,
            None => self.open().await?,
        };

        debug!("Sending command: {command}");
        let request = frame(command, payload);

        let result = tokio::select! {
            result = with_deadline(
                self.timeouts.response(),
                "waiting for the reply",
                exchange(transport.as_mut(), &request),
            ) => result,
            () = &mut aborted => Err(ControlError::Command(
                "Connection closed while waiting for the reply".to_string(),
            )),
        };

        transport.close().await;
        drop(handle);

        if let Ok(reply) = &result {
            trace!("Reply to {command}: {} bytes", reply.len());
        }
        result
    }

    /// Close the held connection, if any.
    ///
    /// An exchange still waiting for its reply fails with
    /// [`ControlError::Command`] instead of hanging.
    pub async fn disconnect(&self) {
        self.abort.notify_waiters();

        if let Some(mut transport) = self.handle.lock().await.take() {
            debug!("Closing control connection");
            transport.close().await;
        }
    }

    async fn open(&self) -> Result<Box<dyn Transport>> {
        with_deadline(
            self.timeouts.connect(),
            "connecting",
            self.connector.connect(),
        )
        .await
    }
}

async fn exchange(transport: &mut dyn Transport, request: &[u8]) -> Result<String> {
    transport.write(request).await?;
    transport.read_to_close().await
}

async fn with_deadline<T>(
    limit: Option<Duration>,
    during: &'static str,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| ControlError::Timeout {
                elapsed: limit,
                during,
            })?,
        None => future.await,
    }
}

/// Build the bytes sent for `command`.
fn frame(command: &str, payload: Option<&[String]>) -> Vec<u8> {
    let mut request = format!("{PROTOCOL_HEADER} {command}\n");

    if let Some(lines) = payload {
        for line in lines {
            request.push_str(line.trim_end_matches(['\r', '\n']));
            request.push('\n');
        }
        request.push_str(END_OF_INPUT);
    }

    request.into_bytes()
}
