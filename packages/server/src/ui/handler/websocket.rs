//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::RoomId,
    ui::{lifecycle::ConnectionLifecycle, state::AppState},
    usecase::ConnectError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub room: Option<String>,
}

/// `GET /ws?room=<id>`; the default room is used when `room` is omitted
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, StatusCode> {
    let room_id = match query.room {
        Some(room) => parse_room_id(room)?,
        None => state.default_room.clone(),
    };

    upgrade(ws, state, room_id).await
}

/// `GET /parties/{party}/{room}` (partysocket-compatible path)
pub async fn party_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((party, room)): Path<(String, String)>,
) -> Result<Response, StatusCode> {
    tracing::debug!("Party '{}' requested room '{}'", party, room);
    let room_id = parse_room_id(room)?;

    upgrade(ws, state, room_id).await
}

fn parse_room_id(raw: String) -> Result<RoomId, StatusCode> {
    RoomId::new(raw.clone()).map_err(|e| {
        tracing::warn!("Invalid room id '{}': {}", raw, e);
        StatusCode::BAD_REQUEST
    })
}

async fn upgrade(
    ws: WebSocketUpgrade,
    state: Arc<AppState>,
    room_id: RoomId,
) -> Result<Response, StatusCode> {
    // Reject before the upgrade so the client sees a plain HTTP status.
    match state.connect_participant_usecase.prepare(&room_id).await {
        Ok(()) => {}
        Err(ConnectError::RoomLimitReached(max)) => {
            tracing::warn!(
                "Room limit of {} reached. Cannot open room '{}'",
                max,
                room_id
            );
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        Err(e) => {
            tracing::error!("Cannot open room '{}': {}", room_id, e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state, room_id))
        .into_response())
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the registry drops the channel or the socket refuses a write.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Abort `task` and wait until it has stopped running.
async fn stop_task<T>(task: &mut JoinHandle<T>) {
    task.abort();
    let _ = task.await;
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let (tx, rx) = mpsc::channel(state.outbound_buffer);

    let mut lifecycle = ConnectionLifecycle::new(
        room_id,
        state.connect_participant_usecase.clone(),
        state.disconnect_participant_usecase.clone(),
    );
    let connection_id = match lifecycle.open(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Failed to open connection on '{}': {}", lifecycle.room_id(), e);
            return;
        }
    };

    let (sender, mut receiver) = socket.split();

    let router = state.router.clone();
    let id = connection_id.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => return Err(e.to_string()),
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received frame from {}: {}", id, text.as_str());
                    router.handle(&id, text.as_str()).await;
                }
                Message::Binary(data) => {
                    tracing::warn!(
                        "Ignoring {} bytes of binary data from {}",
                        data.len(),
                        id
                    );
                }
                Message::Close(_) => {
                    tracing::debug!("Connection {} requested close", id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
        Ok(())
    });

    // Spawn a task to push frames from the room to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, stop the other
    let outcome = tokio::select! {
        result = &mut recv_task => {
            stop_task(&mut send_task).await;
            match result {
                Ok(inner) => inner,
                Err(e) => Err(e.to_string()),
            }
        }
        _ = &mut send_task => {
            // The leave issued by the lifecycle must be queued after any frame
            // this task is still routing.
            stop_task(&mut recv_task).await;
            Err("outbound stream closed".to_string())
        }
    };

    match outcome {
        Ok(()) => lifecycle.close().await,
        Err(reason) => lifecycle.fail(&reason).await,
    }
}
