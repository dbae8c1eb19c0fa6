//! [`MessageSink`] backed by the write half of a byte stream.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::domain::{MessageSink, SinkError};

/// Writes messages straight to an [`AsyncWrite`], typically
/// [`tokio::net::tcp::OwnedWriteHalf`].
///
/// Each message is flushed before `send_line` returns, so a broadcast does not
/// move on to the next peer with bytes still sitting in a buffer.
pub struct StreamSink<W> {
    writer: W,
}

impl<W> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl<W> MessageSink for StreamSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_line(&mut self, line: &str) -> Result<(), SinkError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
