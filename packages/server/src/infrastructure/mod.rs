//! Infrastructure layer: the in-memory registry and the socket-backed sink.

pub mod registry;
pub mod stream_sink;

pub use registry::Registry;
pub use stream_sink::StreamSink;
