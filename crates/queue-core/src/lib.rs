//! Core of the clinic call-next queue.
//!
//! Operators at numbered windows pull the next waiting ticket from a shared
//! daily pool; state changes fan out to display and operator clients. This
//! crate owns the domain: the day-keyed [`pool::TicketPool`], the
//! [`window::WindowRegistry`] and the [`service::QueueService`] that
//! orchestrates them. Persistence and event delivery are injected behind
//! [`store::QueueStore`] and [`store::EventSink`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use queue_core::service::QueueService;
//! use queue_core::store::{MemoryStore, NoOpSink};
//! use queue_core::window::WindowColor;
//!
//! # async fn example() -> queue_core::error::Result<()> {
//! let service =
//!     QueueService::load(Arc::new(MemoryStore::new()), Arc::new(NoOpSink)).await?;
//!
//! let window = service.create_window(1, WindowColor::Green, "Ana").await?;
//! let window = service.call_next(&window.id).await?;
//! assert_eq!(window.current_ticket, "001");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod pool;
pub mod service;
pub mod store;
pub mod window;

pub use error::{QueueError, Result};
pub use events::BroadcastEvent;
pub use pool::{AssignedTicket, CallRecord, TicketPool, EMPTY_TICKET, POOL_CEILING};
pub use service::{QueueService, QueueStatus};
pub use store::{EventSink, MemoryStore, NoOpSink, QueueStore, StoreError};
pub use window::{Window, WindowColor, WindowRegistry};
