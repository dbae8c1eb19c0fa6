//! Helpers shared by the unit tests of this crate.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{ClientRecord, ConnectionId, MessageSink, SinkError};

/// Sink that forwards every line to an unbounded channel
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_line(&mut self, line: &str) -> Result<(), SinkError> {
        self.tx
            .send(line.to_string())
            .map_err(|_| SinkError::Closed)
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Create a record backed by a [`ChannelSink`] and return the receiving end.
pub fn channel_record(username: &str) -> (ClientRecord, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let record = ClientRecord::new(
        ConnectionId::generate(),
        username.to_string(),
        1000,
        Box::new(ChannelSink { tx }),
    );
    (record, rx)
}
