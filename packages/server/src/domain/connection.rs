//! Connection identity and registry records.

use std::fmt;

use uuid::Uuid;

use super::MessageSink;

/// Identity of a single accepted connection.
///
/// A fresh id is generated per accepted socket, so two sessions never compare
/// equal even when they report the same username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a new random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry entry pairing a connection with its self-reported username.
///
/// The record owns the write side of the connection, so removing it from the
/// registry is what hands the socket back to the session for closing.
pub struct ClientRecord {
    pub id: ConnectionId,
    /// Username as sent by the client, trimmed but otherwise unvalidated
    pub username: String,
    /// Unix timestamp when the record was inserted (UTC, milliseconds)
    pub joined_at: i64,
    sink: Box<dyn MessageSink>,
}

impl ClientRecord {
    pub fn new(
        id: ConnectionId,
        username: String,
        joined_at: i64,
        sink: Box<dyn MessageSink>,
    ) -> Self {
        Self {
            id,
            username,
            joined_at,
            sink,
        }
    }

    /// Write target for this client
    pub fn sink_mut(&mut self) -> &mut dyn MessageSink {
        self.sink.as_mut()
    }

    pub fn summary(&self) -> ClientSummary {
        ClientSummary {
            id: self.id,
            username: self.username.clone(),
            joined_at: self.joined_at,
        }
    }
}

impl fmt::Debug for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("joined_at", &self.joined_at)
            .finish_non_exhaustive()
    }
}

/// Read-only view of a [`ClientRecord`], detached from its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSummary {
    pub id: ConnectionId,
    pub username: String,
    pub joined_at: i64,
}
