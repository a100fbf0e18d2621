//! Day-keyed ticket pool.
//!
//! One pool exists per calendar day. It owns the ordered set of numbers not
//! yet called plus the history of numbers already assigned since the last
//! reset. Assigning the ceiling number refills the pool in the same
//! operation, so the queue wraps around without operator intervention.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QueueError, Result};

/// Highest ticket number handed out before the pool wraps back to 1.
pub const POOL_CEILING: u32 = 100;

/// Display value for a window that has no ticket on screen.
pub const EMPTY_TICKET: &str = "000";

/// Format a raw ticket number for display (3 digits, zero padded).
///
/// Numbers are stored and compared as integers everywhere; the padded form
/// only exists at the boundary.
pub fn format_ticket(number: u32) -> String {
    format!("{number:03}")
}

/// One successful assignment since the last reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Raw ticket number.
    pub number: u32,
    /// Display number of the window that called it.
    pub window_number: u32,
    /// When the assignment happened.
    pub called_at: DateTime<Utc>,
}

/// Result of a successful `assign`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedTicket {
    /// Raw number that was assigned.
    pub raw: u32,
    /// Zero-padded display form.
    pub formatted: String,
    /// True when this assignment hit the ceiling and the pool was refilled
    /// as part of the same operation.
    pub wrapped: bool,
}

/// The bounded set of available ticket numbers for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketPool {
    day: NaiveDate,
    available: VecDeque<u32>,
    called: Vec<CallRecord>,
    current: u32,
    last_reset_at: DateTime<Utc>,
}

impl TicketPool {
    /// Create a fresh pool for the given day with the full `1..=100` range.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            available: (1..=POOL_CEILING).collect(),
            called: Vec::new(),
            current: 0,
            last_reset_at: Utc::now(),
        }
    }

    /// Rebuild a pool from persisted parts.
    pub fn from_parts(
        day: NaiveDate,
        available: Vec<u32>,
        called: Vec<CallRecord>,
        current: u32,
        last_reset_at: DateTime<Utc>,
    ) -> Self {
        Self {
            day,
            available: available.into(),
            called,
            current,
            last_reset_at,
        }
    }

    /// The calendar day this pool is keyed by.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Last number assigned, 0 before any assignment.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// When the pool was last (re)initialized.
    pub fn last_reset_at(&self) -> DateTime<Utc> {
        self.last_reset_at
    }

    /// How many numbers are still available.
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Available numbers in assignment order, for persistence.
    pub fn available_numbers(&self) -> Vec<u32> {
        self.available.iter().copied().collect()
    }

    /// Assignments since the last reset, oldest first.
    pub fn called_history(&self) -> &[CallRecord] {
        &self.called
    }

    /// The number the next `assign` would hand out, without mutating state.
    pub fn peek_next(&self) -> Option<u32> {
        self.available.front().copied()
    }

    /// Assign the smallest available number to the given window.
    ///
    /// Removes the number from the available set, records it in the call
    /// history and sets it as current. Assigning the ceiling number refills
    /// the pool atomically; the caller still receives the number that was
    /// assigned, with `wrapped` set.
    pub fn assign(&mut self, window_number: u32) -> Result<AssignedTicket> {
        let number = self.available.pop_front().ok_or(QueueError::Exhausted)?;

        self.called.push(CallRecord {
            number,
            window_number,
            called_at: Utc::now(),
        });
        self.current = number;

        let wrapped = number == POOL_CEILING;
        if wrapped {
            self.refill();
        }

        Ok(AssignedTicket {
            raw: number,
            formatted: format_ticket(number),
            wrapped,
        })
    }

    /// Manual reset back to the full range. Callable at any time.
    pub fn reset(&mut self) {
        self.refill();
    }

    fn refill(&mut self) {
        self.available = (1..=POOL_CEILING).collect();
        self.called.clear();
        self.current = 0;
        self.last_reset_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn assigns_ascending_without_gaps() {
        let mut pool = TicketPool::new(day());

        for expected in 1..=10u32 {
            let ticket = pool.assign(3).unwrap();
            assert_eq!(ticket.raw, expected);
            assert!(!ticket.wrapped);
        }

        assert_eq!(pool.current(), 10);
        assert_eq!(pool.remaining(), (POOL_CEILING - 10) as usize);
        assert_eq!(pool.peek_next(), Some(11));

        let numbers: Vec<u32> = pool.called_history().iter().map(|c| c.number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<u32>>());
    }

    #[test]
    fn formats_three_digits() {
        assert_eq!(format_ticket(1), "001");
        assert_eq!(format_ticket(42), "042");
        assert_eq!(format_ticket(100), "100");
    }

    #[test]
    fn empty_pool_is_exhausted() {
        let mut pool = TicketPool::from_parts(day(), vec![], vec![], 0, Utc::now());
        assert_eq!(pool.peek_next(), None);
        assert_eq!(pool.assign(1), Err(QueueError::Exhausted));
    }

    #[test]
    fn assigning_ceiling_wraps_the_pool() {
        let mut pool = TicketPool::new(day());
        for _ in 1..POOL_CEILING {
            pool.assign(1).unwrap();
        }

        let last = pool.assign(2).unwrap();
        assert_eq!(last.raw, POOL_CEILING);
        assert_eq!(last.formatted, "100");
        assert!(last.wrapped);

        // Refilled in the same operation: history cleared, counter back to 0.
        assert_eq!(pool.current(), 0);
        assert_eq!(pool.peek_next(), Some(1));
        assert_eq!(pool.remaining(), POOL_CEILING as usize);
        assert!(pool.called_history().is_empty());

        let next = pool.assign(2).unwrap();
        assert_eq!(next.raw, 1);
    }

    #[test]
    fn manual_reset_restores_full_range() {
        let mut pool = TicketPool::new(day());
        pool.assign(1).unwrap();
        pool.assign(1).unwrap();

        pool.reset();

        assert_eq!(pool.current(), 0);
        assert_eq!(pool.peek_next(), Some(1));
        assert!(pool.called_history().is_empty());
        assert_eq!(pool.remaining(), POOL_CEILING as usize);
    }

    #[test]
    fn round_trips_through_parts() {
        let mut pool = TicketPool::new(day());
        pool.assign(7).unwrap();
        pool.assign(7).unwrap();

        let restored = TicketPool::from_parts(
            pool.day(),
            pool.available_numbers(),
            pool.called_history().to_vec(),
            pool.current(),
            pool.last_reset_at(),
        );

        assert_eq!(restored, pool);
        assert_eq!(restored.peek_next(), Some(3));
    }
}
