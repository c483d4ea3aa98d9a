// ABOUTME: Console session management for the container's Gogo shell.
// ABOUTME: Owns the single connection and serialises one command at a time over it.

mod connection;
mod error;
mod telnet;
mod transport;

pub use connection::{ConnectionConfig, ConsoleConnection, DEFAULT_PORT, LINE_DELIMITER, PROMPT};
pub use error::{ConsoleError, ConsoleErrorKind, Result};
pub use telnet::{Decoded, TelnetDecoder};
pub use transport::Transport;

use crate::protocol::Command;

/// Exclusive owner of a console transport.
///
/// Every command goes through [`Console::send_command`], which needs `&mut
/// self`; responses therefore arrive in the order the commands were issued.
#[derive(Debug)]
pub struct Console<T> {
    transport: T,
    sent: u64,
}

impl<T: Transport> Console<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, sent: 0 }
    }

    /// Send one command and wait for its response block.
    pub async fn send_command(&mut self, command: &Command) -> Result<String> {
        let line = command.to_line();
        self.sent += 1;
        tracing::debug!(seq = self.sent, command = %line, "sending console command");

        let response = self.transport.exchange(&line).await?;

        tracing::debug!(
            seq = self.sent,
            bytes = response.len(),
            "received console response"
        );
        tracing::trace!(seq = self.sent, response = %response);
        Ok(response)
    }

    /// Number of commands sent over this session.
    pub fn commands_sent(&self) -> u64 {
        self.sent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Close the session and hand back the transport.
    pub async fn close(mut self) -> Result<T> {
        self.transport.close().await?;
        Ok(self.transport)
    }
}
