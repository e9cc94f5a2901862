//! WebSocket connection handlers.

use std::{str::FromStr, sync::Arc};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{CellId, ConnectionId, Notification, PlayedCell, Severity, ValueObjectError},
    infrastructure::dto::websocket::{ClientEvent, UserSelectionRequest},
    ui::state::AppState,
    usecase::{MoveRequest, SubmitMoveError},
};

use super::reply::Reply;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// Every notification for this connection goes through this task, so frames are
/// written in the order they were queued.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Register the outbound queue before anything can be pushed to this connection
    let (tx, rx) = mpsc::unbounded_channel();
    let (connection_id, _session_id) = state.connect_client_usecase.execute(tx).await;
    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text);
                    dispatch(&state_clone, connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let outcome = state
        .disconnect_player_usecase
        .execute(connection_id)
        .await;
    tracing::debug!("Disconnect of '{}' handled: {:?}", connection_id, outcome);
}

/// Parse one inbound frame and run the matching use case.
async fn dispatch(state: &AppState, connection_id: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
            reply(
                state,
                connection_id,
                vec![Notification::alert(
                    "Malformed message was ignored",
                    Severity::Danger,
                )],
            )
            .await;
            return;
        }
    };

    let replies = match event {
        ClientEvent::CreateRoom(request) => state
            .create_room_usecase
            .execute(connection_id, request.name)
            .await
            .err()
            .map(|e| e.replies()),
        ClientEvent::JoinRoom(request) => state
            .join_room_usecase
            .execute(
                connection_id,
                request.name,
                request.room_id,
                request.old_socket_id,
            )
            .await
            .err()
            .map(|e| e.replies()),
        ClientEvent::OnUserSelection(request) => match move_request(&request) {
            Ok(move_request) => state
                .submit_move_usecase
                .execute(connection_id, request.room_id, move_request)
                .await
                .err()
                .map(|e| e.replies()),
            Err(e) => Some(SubmitMoveError::from(e).replies()),
        },
        ClientEvent::GameRestart(room_id) => state
            .restart_game_usecase
            .execute(connection_id, room_id)
            .await
            .err()
            .map(|e| e.replies()),
    };

    if let Some(replies) = replies {
        reply(state, connection_id, replies).await;
    }
}

async fn reply(state: &AppState, connection_id: ConnectionId, notifications: Vec<Notification>) {
    for notification in &notifications {
        if let Err(e) = state
            .message_pusher
            .push_to(&connection_id, notification)
            .await
        {
            tracing::warn!("Failed to reply to '{}': {}", connection_id, e);
        }
    }
}

/// An explicit `cellId` wins; otherwise the legacy `completedCells` array is used.
fn move_request(request: &UserSelectionRequest) -> Result<MoveRequest, ValueObjectError> {
    if let Some(cell_id) = &request.cell_id {
        return CellId::from_str(cell_id).map(MoveRequest::Cell);
    }
    let history = request
        .completed_cells
        .iter()
        .flatten()
        .map(PlayedCell::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MoveRequest::History(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::PlayerSlot, infrastructure::dto::websocket::PlayedCellDto};

    fn selection(cell_id: Option<&str>, completed: Option<Vec<(&str, &str)>>) -> UserSelectionRequest {
        UserSelectionRequest {
            room_id: "AB12".to_string(),
            played_by: None,
            cell_id: cell_id.map(str::to_string),
            completed_cells: completed.map(|cells| {
                cells
                    .into_iter()
                    .map(|(at, by)| PlayedCellDto {
                        clicked_at: at.to_string(),
                        clicked_by: by.to_string(),
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn test_move_request_prefers_cell_id() {
        let request = selection(Some("cell12"), Some(vec![("cell00", "player1")]));

        assert_eq!(move_request(&request), Ok(MoveRequest::Cell(CellId::Cell12)));
    }

    #[test]
    fn test_move_request_from_legacy_history() {
        let request = selection(None, Some(vec![("cell00", "player1")]));

        assert_eq!(
            move_request(&request),
            Ok(MoveRequest::History(vec![PlayedCell {
                cell: CellId::Cell00,
                slot: PlayerSlot::Player1,
            }]))
        );
    }

    #[test]
    fn test_move_request_rejects_unknown_cell() {
        let request = selection(Some("cell33"), None);

        assert_eq!(
            move_request(&request),
            Err(ValueObjectError::InvalidCellId("cell33".to_string()))
        );
    }

    #[test]
    fn test_move_request_without_cells_is_empty_history() {
        let request = selection(None, None);

        assert_eq!(move_request(&request), Ok(MoveRequest::History(Vec::new())));
    }
}
