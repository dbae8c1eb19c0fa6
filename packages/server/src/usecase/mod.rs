//! UseCase layer: operations that combine the registry with message delivery.

mod broadcast;

pub use broadcast::{BroadcastReport, Broadcaster};
