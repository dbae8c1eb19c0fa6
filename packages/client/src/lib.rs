//! Terminal client for the Relaychat line-oriented TCP chat.

pub mod domain;
pub mod error;
pub mod input;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
