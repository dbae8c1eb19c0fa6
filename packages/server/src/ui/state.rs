//! Server state shared by the acceptor and every session.

use std::sync::Arc;

use relaychat_shared::time::Clock;

use crate::{infrastructure::Registry, usecase::Broadcaster};

/// Shared application state
pub struct AppState {
    /// Registry of connected clients
    pub registry: Arc<Registry>,
    /// Fan-out over `registry`
    pub broadcaster: Arc<Broadcaster>,
    /// Source of join timestamps
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create state around an empty registry
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let registry = Arc::new(Registry::new());
        let broadcaster = Arc::new(Broadcaster::new(registry.clone()));
        Self {
            registry,
            broadcaster,
            clock,
        }
    }
}
