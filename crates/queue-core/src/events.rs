//! State-change events delivered to display and operator clients.

use serde::{Deserialize, Serialize};

use crate::window::WindowColor;

/// One event per state-changing action, published after the mutation has
/// committed. Delivery is best-effort; clients joining later must query
/// current state instead of relying on replay.
///
/// Each variant carries enough for a client to update its local view without
/// a follow-up query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BroadcastEvent {
    /// A window pulled the next ticket from the pool.
    TicketCalled {
        window_number: u32,
        color: WindowColor,
        ticket: String,
        /// Public slice of the window's call history, most recent first.
        recently_called: Vec<String>,
    },
    /// An operator re-triggered the alert for the current ticket. No state
    /// changed.
    TicketReannounced { window_number: u32, ticket: String },
    /// A window's announcement text was replaced.
    AnnouncementChanged {
        window_number: u32,
        announcement: String,
    },
    /// The whole queue was manually reset.
    QueueReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_tagged() {
        let event = BroadcastEvent::TicketCalled {
            window_number: 2,
            color: WindowColor::Blue,
            ticket: "014".to_string(),
            recently_called: vec!["014".to_string(), "011".to_string()],
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ticket_called");
        assert_eq!(json["window_number"], 2);
        assert_eq!(json["color"], "blue");
        assert_eq!(json["ticket"], "014");

        let reset = serde_json::to_value(BroadcastEvent::QueueReset).unwrap();
        assert_eq!(reset["type"], "queue_reset");
    }
}
