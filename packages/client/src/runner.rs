//! Client execution logic.

use tokio::{io::BufReader, net::TcpStream};

use crate::{
    error::ClientError,
    input::TerminalInput,
    session::{SessionEnd, run_client_session},
    ui::print_incoming,
};

/// Connect to the chat server and run an interactive session
///
/// # Arguments
///
/// * `host` - Server host (e.g., "127.0.0.1")
/// * `port` - Server port (e.g., 8080)
///
/// # Errors
///
/// Returns an error if the server cannot be reached, if no username is
/// entered, or if sending a message fails.
pub async fn run_client(host: &str, port: u16) -> Result<SessionEnd, ClientError> {
    let addr = format!("{}:{}", host, port);
    println!("Connecting to {}...", addr);

    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Connected to chat server at {}", addr);

    let (read_half, write_half) = stream.into_split();
    let mut input = TerminalInput::spawn();

    let end = run_client_session(
        BufReader::new(read_half),
        write_half,
        &mut input,
        print_incoming,
    )
    .await?;

    match end {
        SessionEnd::ServerClosed => println!("\nConnection to server lost."),
        SessionEnd::InputClosed => tracing::info!("Input closed, leaving the chat"),
    }

    Ok(end)
}
