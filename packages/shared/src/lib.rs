//! Shared utilities for the Relaychat server and client binaries.

pub mod logger;
pub mod time;
