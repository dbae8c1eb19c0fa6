//! Error types for the chat client.

use std::io;

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Writing to the server failed; the connection is gone
    #[error("Failed to send message: {0}")]
    Send(#[source] io::Error),

    /// The user kept entering empty usernames
    #[error("No username entered after {0} attempts")]
    NoUsername(u32),
}
