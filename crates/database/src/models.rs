//! Row types and their conversions to domain values.
//!
//! Array-valued fields (`recently_called`, `available`, `called`) are stored
//! as JSON text columns; day keys as `YYYY-MM-DD`; timestamps as RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use queue_core::pool::{CallRecord, TicketPool};
use queue_core::window::{Window, WindowColor};
use sqlx::FromRow;

use crate::error::{DatabaseError, Result};

/// A persisted service window.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WindowRow {
    pub id: String,
    pub number: i64,
    pub color: String,
    pub active: bool,
    pub operator: String,
    pub current_ticket: String,
    /// JSON array of zero-padded ticket strings, most recent first.
    pub recently_called: String,
    pub announcement: String,
}

impl WindowRow {
    pub fn from_window(window: &Window) -> Self {
        Self {
            id: window.id.clone(),
            number: i64::from(window.number),
            color: window.color.as_str().to_string(),
            active: window.active,
            operator: window.operator.clone(),
            current_ticket: window.current_ticket.clone(),
            recently_called: serde_json::to_string(&window.recently_called)
                .unwrap_or_else(|_| "[]".to_string()),
            announcement: window.announcement.clone(),
        }
    }

    pub fn into_window(self) -> Result<Window> {
        let color = WindowColor::parse(&self.color).map_err(|_| DatabaseError::Invalid {
            entity: "Window",
            reason: format!("unknown color {:?}", self.color),
        })?;
        let recently_called: Vec<String> =
            serde_json::from_str(&self.recently_called).map_err(|e| DatabaseError::Invalid {
                entity: "Window",
                reason: format!("recently_called: {e}"),
            })?;

        Ok(Window {
            id: self.id,
            number: self.number as u32,
            color,
            active: self.active,
            operator: self.operator,
            current_ticket: self.current_ticket,
            recently_called,
            announcement: self.announcement,
        })
    }
}

/// A persisted daily ticket pool.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PoolRow {
    /// Day key, `YYYY-MM-DD`.
    pub day: String,
    pub current_number: i64,
    /// JSON array of raw numbers still available, in assignment order.
    pub available: String,
    /// JSON array of call records since the last reset.
    pub called: String,
    /// RFC 3339 timestamp.
    pub last_reset_at: String,
}

impl PoolRow {
    pub fn from_pool(pool: &TicketPool) -> Self {
        Self {
            day: pool.day().to_string(),
            current_number: i64::from(pool.current()),
            available: serde_json::to_string(&pool.available_numbers())
                .unwrap_or_else(|_| "[]".to_string()),
            called: serde_json::to_string(pool.called_history())
                .unwrap_or_else(|_| "[]".to_string()),
            last_reset_at: pool.last_reset_at().to_rfc3339(),
        }
    }

    pub fn into_pool(self) -> Result<TicketPool> {
        let invalid = |reason: String| DatabaseError::Invalid {
            entity: "TicketPool",
            reason,
        };

        let day: NaiveDate = self.day.parse().map_err(|e| invalid(format!("day: {e}")))?;
        let available: Vec<u32> =
            serde_json::from_str(&self.available).map_err(|e| invalid(format!("available: {e}")))?;
        let called: Vec<CallRecord> =
            serde_json::from_str(&self.called).map_err(|e| invalid(format!("called: {e}")))?;
        let last_reset_at = DateTime::parse_from_rfc3339(&self.last_reset_at)
            .map_err(|e| invalid(format!("last_reset_at: {e}")))?
            .with_timezone(&Utc);

        Ok(TicketPool::from_parts(
            day,
            available,
            called,
            self.current_number as u32,
            last_reset_at,
        ))
    }
}
