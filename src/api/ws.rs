//! Live channel for admin clients: pushes `content-updated` and
//! `new-contact` events to every connection. An `authenticate` message
//! carrying the raw shared secret is acknowledged and flags the socket as
//! an admin session.

use crate::AppState;
use crate::events::ServerEvent;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientMessage {
    Authenticate { token: String },
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();
    let mut is_admin = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let Ok(payload) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if sender.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "WebSocket client lagged behind event stream");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(ClientMessage::Authenticate { token }) =
                            serde_json::from_str(&text)
                        {
                            is_admin = state.tokens.is_raw_secret(&token);
                            let ack = ServerEvent::Authenticated { success: is_admin };
                            let Ok(payload) = serde_json::to_string(&ack) else {
                                continue;
                            };
                            if sender.send(Message::Text(payload.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    if is_admin {
        tracing::debug!("Admin websocket disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticate_message_parses() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type": "authenticate", "token": "secret"}"#).unwrap();
        let ClientMessage::Authenticate { token } = parsed;
        assert_eq!(token, "secret");
    }

    #[test]
    fn unknown_message_types_are_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "ping"}"#).is_err());
    }
}
