//! Application state shared across handlers.

use std::sync::Arc;

use broadcast_hub::BroadcastHub;
use queue_core::QueueService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Queue orchestration service.
    pub service: Arc<QueueService>,
    /// Event fan-out hub.
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: Arc<QueueService>, hub: Arc<BroadcastHub>) -> Self {
        Self { service, hub }
    }
}
