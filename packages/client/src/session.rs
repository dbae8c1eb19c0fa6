//! Chat client session: username handshake, then concurrent send and receive.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    domain::{MAX_USERNAME_ATTEMPTS, normalize_username, outgoing_line},
    error::ClientError,
    input::LineSource,
    ui::{PROMPT, USERNAME_PROMPT},
};

/// How a session that did not fail came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection
    ServerClosed,
    /// The user ended input (Ctrl+D / Ctrl+C)
    InputClosed,
}

/// Ask for a username until a non-blank one is entered.
///
/// # Returns
///
/// * `Ok(Some(username))` - A username was entered
/// * `Ok(None)` - Input ended before a username was entered
/// * `Err(ClientError::NoUsername)` - `max_attempts` blank entries in a row
pub async fn read_username<I>(
    input: &mut I,
    max_attempts: u32,
) -> Result<Option<String>, ClientError>
where
    I: LineSource,
{
    for _ in 0..max_attempts {
        let Some(line) = input.next_line(USERNAME_PROMPT).await else {
            return Ok(None);
        };
        match normalize_username(&line) {
            Some(username) => return Ok(Some(username)),
            None => println!("Username must not be empty."),
        }
    }

    Err(ClientError::NoUsername(max_attempts))
}

/// Run one chat session over an established connection.
///
/// Sends the username first, then relays typed lines to the server while a
/// separate task hands every line received from the server to `on_message`.
///
/// # Arguments
///
/// * `reader` - Read side of the connection
/// * `writer` - Write side of the connection
/// * `input` - Lines typed by the user
/// * `on_message` - Called with each line from the server, terminator included
pub async fn run_client_session<R, W, I, F>(
    reader: R,
    mut writer: W,
    input: &mut I,
    on_message: F,
) -> Result<SessionEnd, ClientError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
    I: LineSource,
    F: FnMut(&str) + Send + 'static,
{
    let Some(username) = read_username(input, MAX_USERNAME_ATTEMPTS).await? else {
        return Ok(SessionEnd::InputClosed);
    };

    writer
        .write_all(format!("{}\n", username).as_bytes())
        .await
        .map_err(ClientError::Send)?;
    tracing::info!("Joined the chat as '{}'", username);
    println!("Connected to the chat. Type a message and press Enter:");

    let mut read_task = tokio::spawn(receive_loop(reader, on_message));

    let result = tokio::select! {
        _ = &mut read_task => Ok(SessionEnd::ServerClosed),
        result = send_loop(&mut writer, input) => result,
    };
    read_task.abort();

    result
}

async fn receive_loop<R, F>(mut reader: R, mut on_message: F)
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&str),
{
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Ok(_) => on_message(&line),
            Err(e) => {
                tracing::warn!("Failed to read from server: {}", e);
                break;
            }
        }
    }
}

async fn send_loop<W, I>(writer: &mut W, input: &mut I) -> Result<SessionEnd, ClientError>
where
    W: AsyncWrite + Unpin,
    I: LineSource,
{
    while let Some(line) = input.next_line(PROMPT).await {
        let Some(message) = outgoing_line(&line) else {
            continue;
        };
        writer
            .write_all(message.as_bytes())
            .await
            .map_err(ClientError::Send)?;
    }

    Ok(SessionEnd::InputClosed)
}
