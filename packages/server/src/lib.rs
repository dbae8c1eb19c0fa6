//! Line-oriented TCP chat server library.
//!
//! Clients connect over plain TCP, send their username as the first line and
//! every following line is relayed to all other connected clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// cross-cutting
pub mod config;
pub mod error;

#[cfg(test)]
mod test_support;
