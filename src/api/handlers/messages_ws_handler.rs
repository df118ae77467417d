//! WebSocket gateway for the connected-clients channel.
//!
//! The handshake must carry a JWT in the `authentication` header. Frames are
//! JSON objects of the form `{"event": ..., "payload": ...}`.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use validator::Validate;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, WS_AUTH_HEADER};
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::services::{ClientRegistry, Registration, ServerEvent};

/// Frames a client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
enum ClientEvent {
    MessageFromClient(ClientMessage),
}

/// Chat line sent by a client. Other payload fields such as `id` are ignored.
#[derive(Debug, Deserialize, Validate)]
struct ClientMessage {
    #[validate(length(min = 1))]
    message: String,
}

pub fn messages_ws_routes() -> Router<AppState> {
    Router::new().route("/ws", get(connect))
}

/// Authenticate the handshake, then upgrade.
///
/// Authentication runs first so a bad token is refused with 401 and never
/// reaches the registry.
pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let user = match authenticate_handshake(&state, &headers).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "WebSocket handshake refused");
            return e.into_response();
        }
    };

    match upgrade {
        Ok(ws) => {
            let clients = state.clients.clone();
            ws.on_upgrade(move |socket| serve_socket(socket, clients, user))
        }
        Err(rejection) => rejection.into_response(),
    }
}

async fn authenticate_handshake(state: &AppState, headers: &HeaderMap) -> AppResult<User> {
    let token = headers
        .get(WS_AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix(BEARER_TOKEN_PREFIX).unwrap_or(h))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

    state.auth_service.authenticate(token).await
}

async fn serve_socket(socket: WebSocket, clients: Arc<ClientRegistry>, user: User) {
    // Subscribe first so this socket also sees its own clients-updated event
    let mut events = clients.subscribe();
    let Registration {
        connection_id,
        mut evicted,
    } = clients.register(&user);
    tracing::info!(%connection_id, user_id = %user.id, "Client connected");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            _ = &mut evicted => {
                tracing::debug!(%connection_id, "Connection replaced by a newer one");
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%connection_id, skipped, "Client lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(message) = parse_client_message(&text) {
                        clients.broadcast_message(connection_id, message);
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(%connection_id, error = %e, "WebSocket receive failed");
                    break;
                }
            },
        }
    }

    clients.remove(connection_id);
    tracing::info!(%connection_id, user_id = %user.id, "Client disconnected");
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode server event");
            return Ok(());
        }
    };

    sender.send(Message::Text(text)).await
}

/// Extract the chat text from a `message-from-client` frame.
///
/// Anything else, including an empty message, is dropped.
fn parse_client_message(text: &str) -> Option<String> {
    let ClientEvent::MessageFromClient(payload) = serde_json::from_str::<ClientEvent>(text).ok()?;
    payload.validate().ok()?;
    Some(payload.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_message() {
        let frame = r#"{"event":"message-from-client","payload":{"id":"abc","message":"hola"}}"#;
        assert_eq!(parse_client_message(frame), Some("hola".to_string()));
    }

    #[test]
    fn test_parse_rejects_empty_and_unknown_frames() {
        let empty = r#"{"event":"message-from-client","payload":{"message":""}}"#;
        let unknown = r#"{"event":"something-else","payload":{"message":"x"}}"#;

        assert_eq!(parse_client_message(empty), None);
        assert_eq!(parse_client_message(unknown), None);
        assert_eq!(parse_client_message("not json"), None);
    }
}
