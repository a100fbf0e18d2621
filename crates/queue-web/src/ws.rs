//! WebSocket endpoint delivering broadcast events.
//!
//! Clients connect, optionally join topics (`display` for the public screen,
//! `window:<id>` for an operator panel) and then receive every queue event
//! as a JSON text frame. Disconnecting removes the connection from the hub.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use broadcast_hub::{ConnectionId, Topic};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::state::AppState;

/// Messages a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Join a topic.
    Join { topic: String },
    /// Leave a topic.
    Leave { topic: String },
}

/// Upgrade the connection and hand it to the socket loop.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (connection, mut events) = state.hub.register();
    debug!(connection, "websocket connected");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match serde_json::to_string(&event) {
                    Ok(text) => {
                        if sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(error = %err, "failed to encode event"),
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&state, connection, &text);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ping/pong is answered by the protocol layer.
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(connection, error = %err, "websocket error");
                        break;
                    }
                }
            }
        }
    }

    state.hub.unsubscribe_all(connection);
    debug!(connection, "websocket disconnected");
}

fn handle_client_message(state: &AppState, connection: ConnectionId, text: &str) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(connection, error = %err, "ignoring malformed client message");
            return;
        }
    };

    match message {
        ClientMessage::Join { topic } => match Topic::parse(&topic) {
            Some(topic) => state.hub.subscribe(connection, topic),
            None => warn!(connection, topic = %topic, "ignoring unknown topic"),
        },
        ClientMessage::Leave { topic } => {
            if let Some(topic) = Topic::parse(&topic) {
                state.hub.unsubscribe(connection, &topic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse() {
        let join: ClientMessage =
            serde_json::from_str(r#"{"type":"join","topic":"display"}"#).unwrap();
        assert!(matches!(join, ClientMessage::Join { topic } if topic == "display"));

        let leave: ClientMessage =
            serde_json::from_str(r#"{"type":"leave","topic":"window:abc"}"#).unwrap();
        assert!(matches!(leave, ClientMessage::Leave { topic } if topic == "window:abc"));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"shout"}"#).is_err());
    }
}
