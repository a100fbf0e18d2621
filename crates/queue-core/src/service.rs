//! Call-next orchestration over the ticket pool and the window registry.
//!
//! `QueueService` is the only place allowed to mutate both together. All
//! pool-mutating operations go through a single write lock, so two
//! concurrent calls can never interleave their read-modify-write of the
//! available set, and a reset can never partially apply while a call is in
//! flight. Events are published only after the mutation has been persisted.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::Result;
use crate::events::BroadcastEvent;
use crate::pool::TicketPool;
use crate::store::{EventSink, QueueStore, StoreError};
use crate::window::{Window, WindowColor, WindowRegistry};

/// Source of "today", injectable so day rollover is testable.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Production clock: the local calendar date, matching the clinic's day.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Snapshot of the pool for status queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueStatus {
    /// Day the pool is keyed by.
    pub day: NaiveDate,
    /// Last number assigned, 0 before any assignment.
    pub current_number: u32,
    /// The number the next call would receive.
    pub next_number: Option<u32>,
    /// Numbers still available.
    pub remaining: usize,
    /// Assignments since the last reset.
    pub called_count: usize,
    /// When the pool was last (re)initialized.
    pub last_reset_at: DateTime<Utc>,
}

struct CoreState {
    pool: TicketPool,
    registry: WindowRegistry,
}

/// The orchestration layer between the HTTP surface, the pool, the registry,
/// persistence and the broadcast fan-out.
pub struct QueueService {
    store: Arc<dyn QueueStore>,
    sink: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    state: RwLock<CoreState>,
}

impl QueueService {
    /// Load persisted windows and today's pool (creating one if absent).
    pub async fn load(store: Arc<dyn QueueStore>, sink: Arc<dyn EventSink>) -> Result<Self> {
        Self::load_with_clock(store, sink, Arc::new(SystemClock)).await
    }

    /// Same as `load` with an explicit clock.
    pub async fn load_with_clock(
        store: Arc<dyn QueueStore>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let windows = store.load_windows().await?;
        let pool = Self::pool_for_day(store.as_ref(), clock.today()).await?;

        info!(
            windows = windows.len(),
            day = %pool.day(),
            next = ?pool.peek_next(),
            "queue service loaded"
        );

        Ok(Self {
            store,
            sink,
            clock,
            state: RwLock::new(CoreState {
                pool,
                registry: WindowRegistry::load(windows),
            }),
        })
    }

    /// Assign the next ticket to a window and broadcast the call.
    ///
    /// Pool assignment, window update and persistence happen under one write
    /// lock hold; concurrent callers observe them as a unit. On a storage
    /// failure the in-memory state is restored and the error surfaced.
    pub async fn call_next(&self, window_id: &str) -> Result<Window> {
        let mut state = self.state.write().await;
        self.ensure_today(&mut state).await?;

        let window_before = state.registry.get(window_id)?.clone();
        let pool_before = state.pool.clone();

        let ticket = state.pool.assign(window_before.number)?;
        let updated = state
            .registry
            .record_call(window_id, &ticket.formatted)?
            .clone();

        if let Err(err) = self.persist_call(&state.pool, &updated).await {
            state.pool = pool_before;
            state.registry.insert(window_before);
            error!(error = %err, window = updated.number, "failed to persist ticket call");
            return Err(err.into());
        }
        drop(state);

        if ticket.wrapped {
            info!(ceiling = crate::pool::POOL_CEILING, "pool ceiling reached, wrapped to a fresh range");
        }
        info!(window = updated.number, ticket = %ticket.formatted, "ticket called");

        self.sink.publish(BroadcastEvent::TicketCalled {
            window_number: updated.number,
            color: updated.color,
            ticket: ticket.formatted,
            recently_called: updated.recent_display().to_vec(),
        });

        Ok(updated)
    }

    /// Re-broadcast a window's current ticket. No state changes.
    pub async fn reannounce(&self, window_id: &str) -> Result<()> {
        let state = self.state.read().await;
        let window = state.registry.get(window_id)?;
        let event = BroadcastEvent::TicketReannounced {
            window_number: window.number,
            ticket: window.current_ticket.clone(),
        };
        drop(state);

        self.sink.publish(event);
        Ok(())
    }

    /// Replace a window's announcement and broadcast the new text.
    pub async fn update_announcement(&self, window_id: &str, text: &str) -> Result<Window> {
        let mut state = self.state.write().await;
        let before = state.registry.get(window_id)?.clone();
        let updated = state.registry.update_announcement(window_id, text)?.clone();

        if let Err(err) = self.store.save_window(&updated).await {
            state.registry.insert(before);
            error!(error = %err, window = updated.number, "failed to persist announcement");
            return Err(err.into());
        }
        drop(state);

        self.sink.publish(BroadcastEvent::AnnouncementChanged {
            window_number: updated.number,
            announcement: updated.announcement.clone(),
        });

        Ok(updated)
    }

    /// Reset one window to its empty state. Emits no event; clients pick the
    /// change up from their next query.
    pub async fn clear_window(&self, window_id: &str) -> Result<Window> {
        let mut state = self.state.write().await;
        let before = state.registry.get(window_id)?.clone();
        let cleared = state.registry.clear(window_id)?.clone();

        if let Err(err) = self.store.save_window(&cleared).await {
            state.registry.insert(before);
            error!(error = %err, window = cleared.number, "failed to persist window clear");
            return Err(err.into());
        }

        Ok(cleared)
    }

    /// Register a new service window.
    pub async fn create_window(
        &self,
        number: i64,
        color: WindowColor,
        operator: &str,
    ) -> Result<Window> {
        let mut state = self.state.write().await;
        let window = state.registry.create(number, color, operator)?.clone();

        if let Err(err) = self.store.save_window(&window).await {
            state.registry.delete(&window.id).ok();
            error!(error = %err, window = window.number, "failed to persist new window");
            return Err(err.into());
        }

        info!(window = window.number, color = %window.color, "window created");
        Ok(window)
    }

    /// Flip a window's active flag.
    pub async fn toggle_window(&self, window_id: &str) -> Result<Window> {
        let mut state = self.state.write().await;
        let before = state.registry.get(window_id)?.clone();
        let toggled = state.registry.toggle_active(window_id)?.clone();

        if let Err(err) = self.store.save_window(&toggled).await {
            state.registry.insert(before);
            error!(error = %err, window = toggled.number, "failed to persist window toggle");
            return Err(err.into());
        }

        info!(window = toggled.number, active = toggled.active, "window toggled");
        Ok(toggled)
    }

    /// Remove a window entirely.
    pub async fn delete_window(&self, window_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let removed = state.registry.delete(window_id)?;

        if let Err(err) = self.store.delete_window(window_id).await {
            state.registry.insert(removed);
            error!(error = %err, "failed to persist window delete");
            return Err(err.into());
        }

        info!(window = removed.number, "window deleted");
        Ok(())
    }

    /// Reset the pool and clear every window, then broadcast the reset.
    /// Mutually exclusive with any in-flight call.
    pub async fn reset_queue(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.ensure_today(&mut state).await?;

        let pool_before = state.pool.clone();
        let windows_before: Vec<Window> =
            state.registry.list().into_iter().cloned().collect();

        state.pool.reset();
        let cleared = state.registry.clear_all();

        if let Err(err) = self.persist_reset(&state.pool, &cleared).await {
            state.pool = pool_before;
            for window in windows_before {
                state.registry.insert(window);
            }
            error!(error = %err, "failed to persist queue reset");
            return Err(err.into());
        }
        drop(state);

        info!("queue reset");
        self.sink.publish(BroadcastEvent::QueueReset);
        Ok(())
    }

    /// All windows, sorted by display number.
    pub async fn list_windows(&self) -> Vec<Window> {
        let state = self.state.read().await;
        state.registry.list().into_iter().cloned().collect()
    }

    /// Active windows only, for the public display.
    pub async fn list_active_windows(&self) -> Vec<Window> {
        let state = self.state.read().await;
        state.registry.list_active().into_iter().cloned().collect()
    }

    /// One window by id.
    pub async fn get_window(&self, window_id: &str) -> Result<Window> {
        let state = self.state.read().await;
        state.registry.get(window_id).cloned()
    }

    /// Pool snapshot. Takes the write lock because first access of a new day
    /// lazily creates that day's pool.
    pub async fn queue_status(&self) -> Result<QueueStatus> {
        let mut state = self.state.write().await;
        self.ensure_today(&mut state).await?;

        Ok(QueueStatus {
            day: state.pool.day(),
            current_number: state.pool.current(),
            next_number: state.pool.peek_next(),
            remaining: state.pool.remaining(),
            called_count: state.pool.called_history().len(),
            last_reset_at: state.pool.last_reset_at(),
        })
    }

    async fn ensure_today(&self, state: &mut CoreState) -> Result<()> {
        let today = self.clock.today();
        if state.pool.day() == today {
            return Ok(());
        }
        state.pool = Self::pool_for_day(self.store.as_ref(), today).await?;
        info!(day = %today, "rolled over to a new daily pool");
        Ok(())
    }

    async fn pool_for_day(store: &dyn QueueStore, day: NaiveDate) -> Result<TicketPool> {
        if let Some(pool) = store.load_pool(day).await? {
            return Ok(pool);
        }
        let pool = TicketPool::new(day);
        store.save_pool(&pool).await?;
        info!(day = %day, "created ticket pool");
        Ok(pool)
    }

    async fn persist_call(&self, pool: &TicketPool, window: &Window) -> std::result::Result<(), StoreError> {
        self.store.save_pool(pool).await?;
        self.store.save_window(window).await
    }

    async fn persist_reset(&self, pool: &TicketPool, windows: &[Window]) -> std::result::Result<(), StoreError> {
        self.store.save_pool(pool).await?;
        for window in windows {
            self.store.save_window(window).await?;
        }
        Ok(())
    }
}
