//! Text the server puts on the wire.
//!
//! Pure functions, kept apart from the session loop so the exact wording can be
//! tested without sockets.

/// Derive a username from the first line a client sends.
///
/// Surrounding whitespace (including the line terminator) is stripped. An empty
/// result is accepted as-is: the server does not validate usernames.
pub fn parse_username(line: &str) -> String {
    line.trim().to_string()
}

/// Announcement sent to the other clients when `username` joins
pub fn join_announcement(username: &str) -> String {
    format!("{} has joined.\n", username)
}

/// Announcement sent to the remaining clients when `username` leaves
pub fn leave_announcement(username: &str) -> String {
    format!("{} has left.\n", username)
}

/// Prefix a received line with its sender.
///
/// `line` is relayed verbatim and keeps its own terminator.
pub fn relay_line(username: &str, line: &str) -> String {
    format!("[{}]: {}", username, line)
}
