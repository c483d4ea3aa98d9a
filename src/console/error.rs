// ABOUTME: Console connection error types with SNAFU context selectors.
// ABOUTME: Every variant is fatal for the operation in progress and is never retried.

use snafu::Snafu;
use std::time::Duration;

/// Failure talking to the console session.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConsoleError {
    #[snafu(display("failed to connect to console at {address}: {source}"))]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[snafu(display("timed out after {timeout:?} connecting to console at {address}"))]
    ConnectTimeout { address: String, timeout: Duration },

    #[snafu(display("failed to write command to console: {source}"))]
    Write { source: std::io::Error },

    #[snafu(display("failed to read console response: {source}"))]
    Read { source: std::io::Error },

    #[snafu(display("console closed the connection"))]
    Closed,

    #[snafu(display("no console prompt within {timeout:?} after '{command}'"))]
    ResponseTimeout { command: String, timeout: Duration },

    #[snafu(display("console transport rejected command: {message}"))]
    Transport { message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleErrorKind {
    /// The session could not be established.
    Unreachable,
    /// The session broke while a command was in flight.
    Disconnected,
    /// The console stopped answering.
    TimedOut,
}

impl ConsoleError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ConsoleErrorKind {
        match self {
            ConsoleError::Connect { .. } => ConsoleErrorKind::Unreachable,
            ConsoleError::ConnectTimeout { .. } | ConsoleError::ResponseTimeout { .. } => {
                ConsoleErrorKind::TimedOut
            }
            ConsoleError::Write { .. }
            | ConsoleError::Read { .. }
            | ConsoleError::Closed
            | ConsoleError::Transport { .. } => ConsoleErrorKind::Disconnected,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
