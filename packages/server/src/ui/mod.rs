//! Network-facing layer: the connection acceptor and per-connection sessions.

mod server;
pub mod session;
mod signal;
pub mod state;

pub use server::Server;
pub use session::{ReadFailure, handle_connection};
pub use signal::shutdown_signal;
pub use state::AppState;
