//! Terminal chat client.
//!
//! Connects to a Relaychat server, asks for a username and then sends every
//! line typed at the `[Me]: ` prompt. Lines from other clients are printed as
//! they arrive.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin relaychat-client
//! cargo run --bin relaychat-client -- --host 192.168.0.10 --port 3000
//! ```

use clap::Parser;

use relaychat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "relaychat-client")]
#[command(about = "Terminal client for the Relaychat TCP chat server", long_about = None)]
struct Args {
    /// Server host to connect to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to connect to
    #[arg(short = 'p', long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing; keep the terminal quiet unless RUST_LOG says otherwise
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    // The readline thread may still be blocked on stdin, so exit explicitly
    match relaychat_client::run_client(&args.host, args.port).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            tracing::error!("Client error: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
