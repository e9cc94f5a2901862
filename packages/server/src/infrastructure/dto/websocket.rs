//! WebSocket message DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Event names and payload field names follow the browser client's contract.

use serde::{Deserialize, Serialize};

// ========================================
// Inbound (client → server)
// ========================================

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    CreateRoom(CreateRoomRequest),
    JoinRoom(JoinRoomRequest),
    OnUserSelection(UserSelectionRequest),
    /// Payload is the bare room code.
    GameRestart(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub name: String,
    pub room_id: String,
    /// Session id persisted by the client from a previous connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_socket_id: Option<String>,
}

/// A move request.
///
/// `cell_id` names the new cell directly. Older clients send the whole
/// `completed_cells` history instead; only the one cell missing from the
/// server's board is taken from it. `played_by` is ignored: the player is
/// identified by the connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSelectionRequest {
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_cells: Option<Vec<PlayedCellDto>>,
}

// ========================================
// Outbound (server → client)
// ========================================

/// Events pushed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Session(SessionMessage),
    CreatedRoom(RoomAckMessage),
    JoinedRoom(RoomAckMessage),
    RoomUpdate(RoomUpdateMessage),
    GameStatusUpdate(GameStatusMessage),
    OnUserSelected(UserSelectedMessage),
    RestartGame,
    Alert(AlertMessage),
    /// Payload is the path to navigate to.
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage {
    pub session_id: String,
    pub connection_id: String,
}

/// Acknowledgement for `created-room` and `joined-room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAckMessage {
    pub name: String,
    pub room_id: String,
    pub session_id: String,
}

/// Player as seen by clients. An empty seat is serialized with all fields empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerDto {
    pub id: Option<String>,
    pub name: Option<String>,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedCellDto {
    pub clicked_at: String,
    pub clicked_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdateMessage {
    pub room_id: String,
    pub player1: PlayerDto,
    pub player2: PlayerDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatusMessage {
    pub room_id: String,
    pub played_cells: Vec<PlayedCellDto>,
    pub player1: PlayerDto,
    pub player2: PlayerDto,
    /// `waiting`, `in-progress` or `finished`.
    pub status: String,
    /// Slot whose turn it is while the game is in progress.
    pub turn: Option<String>,
    /// `player1`, `player2` or `draw` once finished.
    pub winner: Option<String>,
    pub winning_cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSelectedMessage {
    pub completed_cells: Vec<PlayedCellDto>,
    pub played_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub message: String,
    /// `info`, `success`, `warning` or `danger`.
    pub severity: String,
}
