//! Domain layer: connection identity, registry records and the wire text the
//! server produces.

mod announcement;
mod connection;
mod message_sink;

pub use announcement::{join_announcement, leave_announcement, parse_username, relay_line};
pub use connection::{ClientRecord, ClientSummary, ConnectionId};
#[cfg(test)]
pub use message_sink::MockMessageSink;
pub use message_sink::{MessageSink, SinkError};
