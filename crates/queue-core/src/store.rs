//! Boundary traits for the persistence and event-delivery collaborators.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::events::BroadcastEvent;
use crate::pool::TicketPool;
use crate::window::Window;

/// Opaque failure from the persistence collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<StoreError> for crate::error::QueueError {
    fn from(err: StoreError) -> Self {
        crate::error::QueueError::Storage(err.0)
    }
}

/// Persistence collaborator for queue state.
///
/// The core only needs load-all / save-one / find-by-key; the concrete
/// storage engine lives behind this trait.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Load every persisted window.
    async fn load_windows(&self) -> Result<Vec<Window>, StoreError>;

    /// Insert or replace one window.
    async fn save_window(&self, window: &Window) -> Result<(), StoreError>;

    /// Remove one window.
    async fn delete_window(&self, id: &str) -> Result<(), StoreError>;

    /// Load the pool keyed by the given day, if one was persisted.
    async fn load_pool(&self, day: NaiveDate) -> Result<Option<TicketPool>, StoreError>;

    /// Insert or replace the pool for its day.
    async fn save_pool(&self, pool: &TicketPool) -> Result<(), StoreError>;
}

/// Outbound event delivery.
///
/// Publishing is fire-and-forget: it runs after the mutation that produced
/// the event has committed, and failures must never affect the mutation.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: BroadcastEvent);
}

/// A sink that discards all events, for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn publish(&self, _event: BroadcastEvent) {}
}

/// In-memory store, for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: std::sync::Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    windows: std::collections::HashMap<String, Window>,
    pools: std::collections::HashMap<NaiveDate, TicketPool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn load_windows(&self) -> Result<Vec<Window>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.windows.values().cloned().collect())
    }

    async fn save_window(&self, window: &Window) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.windows.insert(window.id.clone(), window.clone());
        Ok(())
    }

    async fn delete_window(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.windows.remove(id);
        Ok(())
    }

    async fn load_pool(&self, day: NaiveDate) -> Result<Option<TicketPool>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.pools.get(&day).cloned())
    }

    async fn save_pool(&self, pool: &TicketPool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.pools.insert(pool.day(), pool.clone());
        Ok(())
    }
}
