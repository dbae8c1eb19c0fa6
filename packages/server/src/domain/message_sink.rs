//! Write-side abstraction over a client connection.
//!
//! The registry stores one sink per client and the broadcaster writes through
//! it, so neither depends on the concrete socket type.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while writing to a single peer
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write to peer: {0}")]
    Io(#[from] std::io::Error),

    #[error("peer connection is closed")]
    Closed,
}

/// Destination for newline-terminated messages addressed to one client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send {
    /// Write one message. The caller supplies the trailing `\n`.
    async fn send_line(&mut self, line: &str) -> Result<(), SinkError>;

    /// Close the write side of the connection
    async fn close(&mut self) -> Result<(), SinkError>;
}
