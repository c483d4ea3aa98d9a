// ABOUTME: Telnet session to the Gogo shell console.
// ABOUTME: Connects, drains the greeting, and reads each response up to the next prompt.

use super::error::{
    ClosedSnafu, ConnectSnafu, ConnectTimeoutSnafu, ReadSnafu, Result, ResponseTimeoutSnafu,
    TransportSnafu, WriteSnafu,
};
use super::telnet::TelnetDecoder;
use super::transport::Transport;
use async_trait::async_trait;
use bytes::BytesMut;
use snafu::ResultExt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default Gogo shell telnet port.
pub const DEFAULT_PORT: u16 = 11311;

/// Prompt the shell prints when it is ready for the next command.
pub const PROMPT: &str = "g! ";

/// Delimiter terminating every command line.
pub const LINE_DELIMITER: &str = "\n";

/// Configuration for establishing a console session.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Console host.
    pub host: String,
    /// Console port (default: 11311).
    pub port: u16,
    /// Timeout for the TCP connect plus greeting (default: 10 seconds).
    pub connect_timeout: Duration,
    /// Timeout for a single command exchange (default: 30 seconds).
    pub command_timeout: Duration,
    /// Prompt terminating each response block.
    pub prompt: String,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
            prompt: PROMPT.to_string(),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// An established console session.
pub struct ConsoleConnection {
    config: ConnectionConfig,
    stream: TcpStream,
    decoder: TelnetDecoder,
    buffer: BytesMut,
    /// Set once an exchange was abandoned mid-flight. A late reply would be
    /// attributed to the next command, so the session refuses further use.
    desynchronized: bool,
}

impl std::fmt::Debug for ConsoleConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConnection")
            .field("config", &self.config)
            .field("desynchronized", &self.desynchronized)
            .finish()
    }
}

impl ConsoleConnection {
    /// Connect to the console and wait for its first prompt.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let address = config.address();

        let stream =
            match tokio::time::timeout(config.connect_timeout, TcpStream::connect(&address)).await
            {
                Ok(result) => result.context(ConnectSnafu {
                    address: address.clone(),
                })?,
                Err(_) => {
                    return ConnectTimeoutSnafu {
                        address,
                        timeout: config.connect_timeout,
                    }
                    .fail();
                }
            };

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!("could not disable Nagle on console socket: {}", e);
        }

        let mut connection = Self {
            config,
            stream,
            decoder: TelnetDecoder::new(),
            buffer: BytesMut::with_capacity(4096),
            desynchronized: false,
        };

        let timeout = connection.config.connect_timeout;
        let greeting = match tokio::time::timeout(timeout, connection.read_response()).await {
            Ok(result) => result?,
            Err(_) => {
                return ResponseTimeoutSnafu {
                    command: "<greeting>",
                    timeout,
                }
                .fail();
            }
        };

        tracing::debug!(
            address = %address,
            greeting_len = greeting.len(),
            "console session established"
        );

        Ok(connection)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Read until the accumulated text ends with the prompt.
    ///
    /// The returned block excludes the trailing prompt.
    async fn read_response(&mut self) -> Result<String> {
        let prompt = self.config.prompt.as_bytes();
        let mut text: Vec<u8> = Vec::new();

        loop {
            self.buffer.clear();
            let read = self
                .stream
                .read_buf(&mut self.buffer)
                .await
                .context(ReadSnafu)?;
            if read == 0 {
                return ClosedSnafu.fail();
            }

            let decoded = self.decoder.decode(&self.buffer);
            if !decoded.replies.is_empty() {
                self.stream
                    .write_all(&decoded.replies)
                    .await
                    .context(WriteSnafu)?;
            }
            text.extend_from_slice(&decoded.data);

            if text.ends_with(prompt) {
                text.truncate(text.len() - prompt.len());
                return Ok(String::from_utf8_lossy(&text).into_owned());
            }
        }
    }

    async fn exchange_inner(&mut self, line: &str) -> Result<String> {
        let mut payload = String::with_capacity(line.len() + LINE_DELIMITER.len());
        payload.push_str(line);
        payload.push_str(LINE_DELIMITER);

        self.stream
            .write_all(payload.as_bytes())
            .await
            .context(WriteSnafu)?;
        self.stream.flush().await.context(WriteSnafu)?;

        self.read_response().await
    }
}

#[async_trait]
impl Transport for ConsoleConnection {
    async fn exchange(&mut self, line: &str) -> Result<String> {
        if self.desynchronized {
            return TransportSnafu {
                message: "session abandoned a previous command and is out of step",
            }
            .fail();
        }

        let timeout = self.config.command_timeout;
        match tokio::time::timeout(timeout, self.exchange_inner(line)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                self.desynchronized = true;
                Err(e)
            }
            Err(_) => {
                self.desynchronized = true;
                ResponseTimeoutSnafu {
                    command: line,
                    timeout,
                }
                .fail()
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if !self.desynchronized {
            let goodbye = format!("disconnect{LINE_DELIMITER}");
            self.stream
                .write_all(goodbye.as_bytes())
                .await
                .context(WriteSnafu)?;
        }
        self.stream.shutdown().await.context(WriteSnafu)?;
        Ok(())
    }
}
