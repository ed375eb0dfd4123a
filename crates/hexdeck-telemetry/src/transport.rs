//! Transport abstraction over the controller link.
//!
//! The channel supervisor only sees these traits; the TCP implementation
//! lives here and tests substitute scripted fakes.

use crate::frames::{Command, InboundFrame};
use async_trait::async_trait;
use hexdeck_core::ChannelError;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// An established duplex session.
#[async_trait]
pub trait TelemetryConnection: Send {
    async fn send(&mut self, command: &Command) -> Result<(), ChannelError>;

    /// Receive the next frame. `MalformedFrame` is recoverable (the
    /// session continues); `ConnectionLost` terminates it.
    async fn recv(&mut self) -> Result<InboundFrame, ChannelError>;
}

/// Connection factory. One `connect` call per (re)connect attempt.
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    async fn connect(&self, address: &str) -> Result<Box<dyn TelemetryConnection>, ChannelError>;
}

/// Newline-delimited JSON over TCP.
pub struct TcpTransport;

#[async_trait]
impl TelemetryTransport for TcpTransport {
    async fn connect(&self, address: &str) -> Result<Box<dyn TelemetryConnection>, ChannelError> {
        let stream =
            TcpStream::connect(address)
                .await
                .map_err(|e| ChannelError::ConnectFailed {
                    address: address.to_string(),
                    reason: e.to_string(),
                })?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "failed to set TCP_NODELAY");
        }
        let (read, write) = stream.into_split();
        Ok(Box::new(TcpConnection {
            lines: BufReader::new(read).lines(),
            writer: write,
        }))
    }
}

struct TcpConnection {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

#[async_trait]
impl TelemetryConnection for TcpConnection {
    async fn send(&mut self, command: &Command) -> Result<(), ChannelError> {
        let mut line = serde_json::to_string(command).map_err(|e| ChannelError::MalformedFrame {
            reason: e.to_string(),
        })?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ChannelError::ConnectionLost {
                reason: e.to_string(),
            })
    }

    async fn recv(&mut self) -> Result<InboundFrame, ChannelError> {
        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| ChannelError::ConnectionLost {
                    reason: e.to_string(),
                })?
                .ok_or_else(|| ChannelError::ConnectionLost {
                    reason: "peer closed the connection".to_string(),
                })?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return serde_json::from_str(trimmed).map_err(|e| ChannelError::MalformedFrame {
                reason: e.to_string(),
            });
        }
    }
}
