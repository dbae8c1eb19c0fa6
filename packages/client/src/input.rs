//! Terminal line input.
//!
//! `rustyline` is synchronous, so it runs on a dedicated thread. The async side
//! asks for one line at a time, passing the prompt to show.

use std::{sync::mpsc as std_mpsc, thread};

use async_trait::async_trait;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Source of lines typed by the user
#[async_trait]
pub trait LineSource: Send {
    /// Show `prompt` and wait for the next line; `None` once input has ended
    async fn next_line(&mut self, prompt: &str) -> Option<String>;
}

/// [`LineSource`] backed by a `rustyline` editor on a blocking thread
pub struct TerminalInput {
    prompts: std_mpsc::Sender<String>,
    lines: mpsc::UnboundedReceiver<String>,
}

impl TerminalInput {
    /// Start the readline thread
    pub fn spawn() -> Self {
        let (prompt_tx, prompt_rx) = std_mpsc::channel::<String>();
        let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();

        thread::spawn(move || {
            let mut rl = match DefaultEditor::new() {
                Ok(rl) => rl,
                Err(e) => {
                    eprintln!("Failed to initialize readline: {}", e);
                    return;
                }
            };

            for prompt in prompt_rx {
                match rl.readline(&prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            rl.add_history_entry(line.as_str()).ok();
                        }
                        if line_tx.send(line).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted) => {
                        // Ctrl+C
                        tracing::info!("Interrupted");
                        break;
                    }
                    Err(ReadlineError::Eof) => {
                        // Ctrl+D
                        tracing::info!("EOF");
                        break;
                    }
                    Err(err) => {
                        tracing::error!("Readline error: {}", err);
                        break;
                    }
                }
            }
        });

        Self {
            prompts: prompt_tx,
            lines: line_rx,
        }
    }
}

#[async_trait]
impl LineSource for TerminalInput {
    async fn next_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.send(prompt.to_string()).ok()?;
        self.lines.recv().await
    }
}
