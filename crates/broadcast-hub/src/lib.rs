//! In-process pub/sub fan-out for queue events.
//!
//! The hub keeps a lock-protected registry of connections and their topic
//! memberships. Every state-change event is delivered over per-connection
//! unbounded channels; delivery is fire-and-forget, and a connection whose
//! receiver has gone away is pruned on the next publish.
//!
//! Two kinds of topics exist: one public `display` topic and one
//! `window:<id>` topic per operator panel. Publishing currently fans out to
//! every connection regardless of topic, so every connected party observes
//! every event; the topic membership is informational grouping.
//!
//! # Example
//!
//! ```
//! use broadcast_hub::{BroadcastHub, Topic};
//! use queue_core::BroadcastEvent;
//!
//! let hub = BroadcastHub::new();
//! let (id, mut events) = hub.register();
//! hub.subscribe(id, Topic::Display);
//!
//! hub.publish(BroadcastEvent::QueueReset);
//! assert_eq!(events.try_recv().unwrap(), BroadcastEvent::QueueReset);
//!
//! hub.unsubscribe_all(id);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use queue_core::{BroadcastEvent, EventSink};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Identity of one connected client, unique for the process lifetime.
pub type ConnectionId = u64;

/// A subscription topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// The public waiting-room screen.
    Display,
    /// One operator panel, keyed by window id.
    Window(String),
}

impl Topic {
    /// Parse the wire form: `display` or `window:<id>`.
    pub fn parse(value: &str) -> Option<Self> {
        if value == "display" {
            return Some(Topic::Display);
        }
        value
            .strip_prefix("window:")
            .filter(|id| !id.is_empty())
            .map(|id| Topic::Window(id.to_string()))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Display => f.write_str("display"),
            Topic::Window(id) => write!(f, "window:{id}"),
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    connections: HashMap<ConnectionId, UnboundedSender<BroadcastEvent>>,
    topics: HashMap<Topic, HashSet<ConnectionId>>,
}

/// Fan-out layer between the queue service and the transport.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    next_id: AtomicU64,
    registry: Mutex<Registry>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection and hand back the receiving end of its channel.
    /// The transport drains the receiver and forwards events to the client.
    pub fn register(&self) -> (ConnectionId, UnboundedReceiver<BroadcastEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        let mut registry = self.registry.lock().unwrap();
        registry.connections.insert(id, tx);
        debug!(connection = id, "connection registered");
        (id, rx)
    }

    /// Join a topic. Joining twice is a no-op.
    pub fn subscribe(&self, connection: ConnectionId, topic: Topic) {
        let mut registry = self.registry.lock().unwrap();
        if !registry.connections.contains_key(&connection) {
            return;
        }
        debug!(connection, topic = %topic, "subscribed");
        registry.topics.entry(topic).or_default().insert(connection);
    }

    /// Leave a single topic.
    pub fn unsubscribe(&self, connection: ConnectionId, topic: &Topic) {
        let mut registry = self.registry.lock().unwrap();
        if let Some(members) = registry.topics.get_mut(topic) {
            members.remove(&connection);
            if members.is_empty() {
                registry.topics.remove(topic);
            }
        }
    }

    /// Drop a connection and all its topic memberships. Called on
    /// disconnect.
    pub fn unsubscribe_all(&self, connection: ConnectionId) {
        let mut registry = self.registry.lock().unwrap();
        registry.connections.remove(&connection);
        registry.topics.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
        debug!(connection, "connection removed");
    }

    /// Deliver an event to every current connection. Returns how many
    /// connections it reached. Connections whose receiver is gone are
    /// dropped here; nothing is retried or queued for them.
    pub fn publish(&self, event: BroadcastEvent) -> usize {
        let mut registry = self.registry.lock().unwrap();

        let mut dead = Vec::new();
        let mut delivered = 0;
        for (&id, tx) in &registry.connections {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                dead.push(id);
            }
        }

        for id in dead {
            registry.connections.remove(&id);
            registry.topics.retain(|_, members| {
                members.remove(&id);
                !members.is_empty()
            });
            debug!(connection = id, "pruned dead connection");
        }

        delivered
    }

    /// How many connections are currently registered.
    pub fn connection_count(&self) -> usize {
        self.registry.lock().unwrap().connections.len()
    }

    /// How many connections joined a topic.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.registry
            .lock()
            .unwrap()
            .topics
            .get(topic)
            .map_or(0, HashSet::len)
    }
}

impl EventSink for BroadcastHub {
    fn publish(&self, event: BroadcastEvent) {
        BroadcastHub::publish(self, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset_event() -> BroadcastEvent {
        BroadcastEvent::QueueReset
    }

    #[test]
    fn topic_wire_form_round_trips() {
        assert_eq!(Topic::parse("display"), Some(Topic::Display));
        assert_eq!(
            Topic::parse("window:abc-123"),
            Some(Topic::Window("abc-123".to_string()))
        );
        assert_eq!(Topic::parse("window:"), None);
        assert_eq!(Topic::parse("screen"), None);

        let topic = Topic::Window("abc".to_string());
        assert_eq!(Topic::parse(&topic.to_string()), Some(topic));
    }

    #[tokio::test]
    async fn publish_reaches_every_connection() {
        let hub = BroadcastHub::new();
        let (display, mut display_rx) = hub.register();
        let (operator, mut operator_rx) = hub.register();
        hub.subscribe(display, Topic::Display);
        hub.subscribe(operator, Topic::Window("w1".to_string()));

        let delivered = hub.publish(reset_event());

        assert_eq!(delivered, 2);
        assert_eq!(display_rx.recv().await, Some(reset_event()));
        assert_eq!(operator_rx.recv().await, Some(reset_event()));
    }

    #[tokio::test]
    async fn unjoined_connection_still_hears_events() {
        // Global fan-out: registration is enough to receive.
        let hub = BroadcastHub::new();
        let (_, mut rx) = hub.register();

        assert_eq!(hub.publish(reset_event()), 1);
        assert_eq!(rx.recv().await, Some(reset_event()));
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_publish() {
        let hub = BroadcastHub::new();
        let (id, rx) = hub.register();
        hub.subscribe(id, Topic::Display);
        drop(rx);

        assert_eq!(hub.publish(reset_event()), 0);
        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.subscriber_count(&Topic::Display), 0);
    }

    #[tokio::test]
    async fn unsubscribe_all_removes_every_membership() {
        let hub = BroadcastHub::new();
        let (id, _rx) = hub.register();
        hub.subscribe(id, Topic::Display);
        hub.subscribe(id, Topic::Window("w1".to_string()));

        hub.unsubscribe_all(id);

        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.subscriber_count(&Topic::Display), 0);
        assert_eq!(hub.subscriber_count(&Topic::Window("w1".to_string())), 0);
    }

    #[tokio::test]
    async fn single_unsubscribe_keeps_other_topics() {
        let hub = BroadcastHub::new();
        let (id, _rx) = hub.register();
        hub.subscribe(id, Topic::Display);
        hub.subscribe(id, Topic::Window("w1".to_string()));

        hub.unsubscribe(id, &Topic::Display);

        assert_eq!(hub.subscriber_count(&Topic::Display), 0);
        assert_eq!(hub.subscriber_count(&Topic::Window("w1".to_string())), 1);
        // Still connected, still receives.
        assert_eq!(hub.publish(reset_event()), 1);
    }

    #[tokio::test]
    async fn subscribe_unknown_connection_is_ignored() {
        let hub = BroadcastHub::new();
        hub.subscribe(99, Topic::Display);
        assert_eq!(hub.subscriber_count(&Topic::Display), 0);
    }
}
