//! UI utilities for the client.

use std::io::Write;

/// Prompt shown while the user types chat messages
pub const PROMPT: &str = "[Me]: ";

/// Prompt shown while asking for a username
pub const USERNAME_PROMPT: &str = "Please enter your username: ";

/// Return to column 0 and erase the line, so an incoming message replaces the
/// prompt instead of being appended to it
const CLEAR_LINE: &str = "\r\x1b[K";

/// Format a line received from the server for display
pub fn format_incoming(line: &str) -> String {
    let mut output = format!("{}{}", CLEAR_LINE, line);
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Print a line received from the server and redraw the prompt
pub fn print_incoming(line: &str) {
    print!("{}", format_incoming(line));
    redisplay_prompt();
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
