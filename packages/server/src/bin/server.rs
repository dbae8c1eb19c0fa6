//! Line-oriented TCP chat server.
//!
//! The first line a client sends is its username; every following line is
//! relayed to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin relaychat-server
//! cargo run --bin relaychat-server -- --host 127.0.0.1 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use relaychat_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig},
    ui::{AppState, Server, shutdown_signal},
};
use relaychat_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "relaychat-server")]
#[command(about = "TCP chat server relaying each line to all other clients", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig::new(args.host, args.port);

    let state = Arc::new(AppState::new(Arc::new(SystemClock)));
    let server = match Server::bind(&config, state).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run_until(shutdown_signal()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
