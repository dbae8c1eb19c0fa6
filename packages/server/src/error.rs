//! Error types for the chat server.

use std::io;

use thiserror::Error;

/// Errors raised by the connection acceptor
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound; fatal at startup
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A single accept call failed; the accept loop keeps running
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),
}
