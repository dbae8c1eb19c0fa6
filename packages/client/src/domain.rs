//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

/// How many times the username prompt is shown before giving up
pub const MAX_USERNAME_ATTEMPTS: u32 = 5;

/// Normalize user input into a username.
///
/// # Returns
///
/// The trimmed input, or `None` if nothing but whitespace was entered
pub fn normalize_username(input: &str) -> Option<String> {
    let username = input.trim();
    if username.is_empty() {
        None
    } else {
        Some(username.to_string())
    }
}

/// Turn a line typed by the user into the wire form sent to the server.
///
/// # Returns
///
/// The trimmed line with a single trailing `\n`, or `None` for blank input
pub fn outgoing_line(input: &str) -> Option<String> {
    let message = input.trim();
    if message.is_empty() {
        None
    } else {
        Some(format!("{}\n", message))
    }
}
