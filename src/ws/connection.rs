//! WebSocket connection lifecycle management.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::http::routes::AppState;
use crate::room::manager::DEFAULT_SESSION;
use crate::ws::protocol::{self, ServerEvent};

pub async fn ws_default(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, DEFAULT_SESSION.to_string(), socket))
}

pub async fn ws_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, session_id, socket))
}

async fn handle_socket(state: AppState, session_id: String, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    // channel for server -> client messages
    let (sv_tx, mut sv_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let (session, conn) = state.sessions.connect(&session_id, sv_tx);

    let writer_conn = conn.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = sv_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!(conn = %writer_conn, error = %err, "encode failed");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => match protocol::decode(&text) {
                Ok(event) => session.handle(&conn, event),
                Err(err) => session.reject(&conn, &err),
            },
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    session.disconnect(&conn);
    writer.abort();
    state.sessions.prune_if_idle(session.id());
    tracing::debug!(session = %session.id(), %conn, "ws closed");
}
