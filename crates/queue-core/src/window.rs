//! Service windows and the in-memory registry that owns them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QueueError, Result};
use crate::pool::EMPTY_TICKET;

/// Maximum allowed length for a window announcement.
pub const ANNOUNCEMENT_MAX_LEN: usize = 200;

/// How many called numbers each window retains.
pub const RECENT_CALLS_KEPT: usize = 10;

/// How many of those are shown on public-facing views and events.
pub const RECENT_CALLS_SHOWN: usize = 5;

/// Display color of a window, a fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowColor {
    Green,
    Blue,
    Red,
    Black,
}

impl WindowColor {
    /// Lowercase text form, as stored and sent over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            WindowColor::Green => "green",
            WindowColor::Blue => "blue",
            WindowColor::Red => "red",
            WindowColor::Black => "black",
        }
    }

    /// Parse the text form back. Anything outside the palette is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "green" => Ok(WindowColor::Green),
            "blue" => Ok(WindowColor::Blue),
            "red" => Ok(WindowColor::Red),
            "black" => Ok(WindowColor::Black),
            other => Err(QueueError::UnknownColor {
                value: other.to_string(),
            }),
        }
    }
}

impl Default for WindowColor {
    fn default() -> Self {
        WindowColor::Green
    }
}

impl fmt::Display for WindowColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical service point that calls tickets.
///
/// Created administratively and persists across days; only `current_ticket`,
/// `recently_called` and `announcement` change during normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Stable identity.
    pub id: String,
    /// Display label, unique across windows.
    pub number: u32,
    /// Display color.
    pub color: WindowColor,
    /// Inactive windows are excluded from the public display.
    pub active: bool,
    /// Operator label, informational only.
    pub operator: String,
    /// Ticket currently on screen, zero-padded, `"000"` when empty.
    pub current_ticket: String,
    /// Last called numbers, most recent first, at most `RECENT_CALLS_KEPT`.
    pub recently_called: Vec<String>,
    /// Free-text announcement shown under the window.
    pub announcement: String,
}

impl Window {
    fn new(number: u32, color: WindowColor, operator: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number,
            color,
            active: true,
            operator: operator.to_string(),
            current_ticket: EMPTY_TICKET.to_string(),
            recently_called: Vec::new(),
            announcement: String::new(),
        }
    }

    /// The slice of recent calls shown publicly.
    pub fn recent_display(&self) -> &[String] {
        let end = self.recently_called.len().min(RECENT_CALLS_SHOWN);
        &self.recently_called[..end]
    }
}

/// Owns all windows, keyed by id. Validation happens here, before mutation.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<String, Window>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from persisted windows.
    pub fn load(windows: Vec<Window>) -> Self {
        Self {
            windows: windows.into_iter().map(|w| (w.id.clone(), w)).collect(),
        }
    }

    /// Put a window back, replacing any existing entry with the same id.
    /// Used when restoring state after a failed persistence write.
    pub fn insert(&mut self, window: Window) {
        self.windows.insert(window.id.clone(), window);
    }

    /// Number of registered windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Window> {
        self.windows.get(id).ok_or_else(|| QueueError::WindowNotFound {
            id: id.to_string(),
        })
    }

    /// Create a new active window with an empty ticket.
    pub fn create(&mut self, number: i64, color: WindowColor, operator: &str) -> Result<&Window> {
        if number <= 0 {
            return Err(QueueError::InvalidNumber { number });
        }
        let number = number as u32;
        if self.windows.values().any(|w| w.number == number) {
            return Err(QueueError::DuplicateNumber { number });
        }

        let window = Window::new(number, color, operator);
        let id = window.id.clone();
        self.windows.insert(id.clone(), window);
        Ok(&self.windows[&id])
    }

    /// Flip the active flag. Ticket and history are untouched.
    pub fn toggle_active(&mut self, id: &str) -> Result<&Window> {
        let window = self.get_mut(id)?;
        window.active = !window.active;
        Ok(window)
    }

    /// Remove a window, returning it for rollback purposes.
    pub fn delete(&mut self, id: &str) -> Result<Window> {
        self.windows.remove(id).ok_or_else(|| QueueError::WindowNotFound {
            id: id.to_string(),
        })
    }

    /// Replace the announcement text.
    pub fn update_announcement(&mut self, id: &str, text: &str) -> Result<&Window> {
        if text.chars().count() > ANNOUNCEMENT_MAX_LEN {
            return Err(QueueError::AnnouncementTooLong {
                len: text.chars().count(),
            });
        }
        let window = self.get_mut(id)?;
        window.announcement = text.to_string();
        Ok(window)
    }

    /// Record a called ticket: set it current and prepend it to the bounded
    /// history.
    pub fn record_call(&mut self, id: &str, formatted: &str) -> Result<&Window> {
        let window = self.get_mut(id)?;
        window.current_ticket = formatted.to_string();
        window.recently_called.insert(0, formatted.to_string());
        window.recently_called.truncate(RECENT_CALLS_KEPT);
        Ok(window)
    }

    /// Reset a single window to its empty state.
    pub fn clear(&mut self, id: &str) -> Result<&Window> {
        let window = self.get_mut(id)?;
        Self::clear_window(window);
        Ok(window)
    }

    /// Reset every window. Returns the cleared windows for persistence.
    pub fn clear_all(&mut self) -> Vec<Window> {
        for window in self.windows.values_mut() {
            Self::clear_window(window);
        }
        self.list().into_iter().cloned().collect()
    }

    /// All windows, sorted by display number ascending.
    pub fn list(&self) -> Vec<&Window> {
        let mut windows: Vec<&Window> = self.windows.values().collect();
        windows.sort_by_key(|w| w.number);
        windows
    }

    /// Active windows only, sorted by display number ascending.
    pub fn list_active(&self) -> Vec<&Window> {
        self.list().into_iter().filter(|w| w.active).collect()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Window> {
        self.windows.get_mut(id).ok_or_else(|| QueueError::WindowNotFound {
            id: id.to_string(),
        })
    }

    fn clear_window(window: &mut Window) {
        window.current_ticket = EMPTY_TICKET.to_string();
        window.recently_called.clear();
        window.announcement.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validates_number() {
        let mut registry = WindowRegistry::new();

        assert_eq!(
            registry.create(0, WindowColor::Green, ""),
            Err(QueueError::InvalidNumber { number: 0 })
        );
        assert_eq!(
            registry.create(-3, WindowColor::Green, ""),
            Err(QueueError::InvalidNumber { number: -3 })
        );

        let window = registry.create(1, WindowColor::Blue, "Ana").unwrap();
        assert_eq!(window.number, 1);
        assert_eq!(window.color, WindowColor::Blue);
        assert!(window.active);
        assert_eq!(window.current_ticket, EMPTY_TICKET);
    }

    #[test]
    fn duplicate_number_is_rejected_and_registry_unchanged() {
        let mut registry = WindowRegistry::new();
        registry.create(4, WindowColor::Green, "").unwrap();

        let before = registry.len();
        assert_eq!(
            registry.create(4, WindowColor::Red, "other"),
            Err(QueueError::DuplicateNumber { number: 4 })
        );
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn record_call_bounds_history() {
        let mut registry = WindowRegistry::new();
        let id = registry.create(1, WindowColor::Green, "").unwrap().id.clone();

        for n in 1..=12u32 {
            registry.record_call(&id, &crate::pool::format_ticket(n)).unwrap();
        }

        let window = registry.get(&id).unwrap();
        assert_eq!(window.current_ticket, "012");
        assert_eq!(window.recently_called.len(), RECENT_CALLS_KEPT);
        assert_eq!(window.recently_called[0], "012");
        assert_eq!(window.recently_called.last().unwrap(), "003");
        assert_eq!(window.recent_display().len(), RECENT_CALLS_SHOWN);
        assert_eq!(
            window.recent_display().to_vec(),
            ["012", "011", "010", "009", "008"]
        );
    }

    #[test]
    fn toggle_keeps_ticket_state() {
        let mut registry = WindowRegistry::new();
        let id = registry.create(2, WindowColor::Black, "").unwrap().id.clone();
        registry.record_call(&id, "005").unwrap();

        let window = registry.toggle_active(&id).unwrap();
        assert!(!window.active);
        assert_eq!(window.current_ticket, "005");

        let window = registry.toggle_active(&id).unwrap();
        assert!(window.active);
    }

    #[test]
    fn announcement_length_is_enforced() {
        let mut registry = WindowRegistry::new();
        let id = registry.create(1, WindowColor::Green, "").unwrap().id.clone();

        let too_long = "x".repeat(ANNOUNCEMENT_MAX_LEN + 1);
        assert_eq!(
            registry.update_announcement(&id, &too_long),
            Err(QueueError::AnnouncementTooLong {
                len: ANNOUNCEMENT_MAX_LEN + 1
            })
        );
        assert_eq!(registry.get(&id).unwrap().announcement, "");

        let exact = "x".repeat(ANNOUNCEMENT_MAX_LEN);
        registry.update_announcement(&id, &exact).unwrap();
        assert_eq!(registry.get(&id).unwrap().announcement, exact);
    }

    #[test]
    fn clear_resets_window() {
        let mut registry = WindowRegistry::new();
        let id = registry.create(1, WindowColor::Green, "").unwrap().id.clone();
        registry.record_call(&id, "017").unwrap();
        registry.update_announcement(&id, "lunch break").unwrap();

        let window = registry.clear(&id).unwrap();
        assert_eq!(window.current_ticket, EMPTY_TICKET);
        assert!(window.recently_called.is_empty());
        assert_eq!(window.announcement, "");
    }

    #[test]
    fn listing_sorts_by_number_and_filters_active() {
        let mut registry = WindowRegistry::new();
        let id3 = registry.create(3, WindowColor::Green, "").unwrap().id.clone();
        registry.create(1, WindowColor::Green, "").unwrap();
        registry.create(2, WindowColor::Green, "").unwrap();
        registry.toggle_active(&id3).unwrap();

        let numbers: Vec<u32> = registry.list().iter().map(|w| w.number).collect();
        assert_eq!(numbers, [1, 2, 3]);

        let active: Vec<u32> = registry.list_active().iter().map(|w| w.number).collect();
        assert_eq!(active, [1, 2]);
    }

    #[test]
    fn unknown_color_is_rejected() {
        assert_eq!(WindowColor::parse("green"), Ok(WindowColor::Green));
        assert_eq!(
            WindowColor::parse("purple"),
            Err(QueueError::UnknownColor {
                value: "purple".to_string()
            })
        );
    }
}
