//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    Evaluation, Notification, PlayedCell, Player, Room, RoomStatus, Severity, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};
use sanmoku_shared::time::to_jst_rfc3339;

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<&dto::PlayedCellDto> for PlayedCell {
    type Error = ValueObjectError;

    fn try_from(dto: &dto::PlayedCellDto) -> Result<Self, Self::Error> {
        Ok(Self {
            cell: dto.clicked_at.parse()?,
            slot: dto.clicked_by.parse()?,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&PlayedCell> for dto::PlayedCellDto {
    fn from(model: &PlayedCell) -> Self {
        Self {
            clicked_at: model.cell.as_str().to_string(),
            clicked_by: model.slot.as_str().to_string(),
        }
    }
}

impl From<Option<&Player>> for dto::PlayerDto {
    fn from(model: Option<&Player>) -> Self {
        match model {
            Some(player) => Self {
                id: Some(player.connection_id.to_string()),
                name: Some(player.name.as_str().to_string()),
                online: player.online,
            },
            None => Self::default(),
        }
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "success",
        Severity::Warning => "warning",
        Severity::Danger => "danger",
    }
}

/// Winner label and winning cells of a finished game.
fn outcome(room: &Room) -> (Option<String>, Vec<String>) {
    match room.status() {
        RoomStatus::Finished(Evaluation::Win { slot, line }) => (
            Some(slot.as_str().to_string()),
            line.iter().map(|cell| cell.as_str().to_string()).collect(),
        ),
        RoomStatus::Finished(Evaluation::Draw) => (Some("draw".to_string()), Vec::new()),
        _ => (None, Vec::new()),
    }
}

fn turn(room: &Room) -> Option<String> {
    (room.status() == RoomStatus::InProgress).then(|| room.current_turn().as_str().to_string())
}

fn played_cells(cells: &[PlayedCell]) -> Vec<dto::PlayedCellDto> {
    cells.iter().map(dto::PlayedCellDto::from).collect()
}

impl From<&Room> for dto::RoomUpdateMessage {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.as_str().to_string(),
            player1: Some(room.player1()).into(),
            player2: room.player2().into(),
        }
    }
}

impl From<&Room> for dto::GameStatusMessage {
    fn from(room: &Room) -> Self {
        let (winner, winning_cells) = outcome(room);
        Self {
            room_id: room.id.as_str().to_string(),
            played_cells: played_cells(room.played_cells()),
            player1: Some(room.player1()).into(),
            player2: room.player2().into(),
            status: room.status().as_str().to_string(),
            turn: turn(room),
            winner,
            winning_cells,
        }
    }
}

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::SessionIssued {
                session_id,
                connection_id,
            } => Self::Session(dto::SessionMessage {
                session_id: session_id.as_str().to_string(),
                connection_id: connection_id.to_string(),
            }),
            Notification::RoomCreated {
                name,
                room_id,
                session_id,
            } => Self::CreatedRoom(dto::RoomAckMessage {
                name: name.as_str().to_string(),
                room_id: room_id.as_str().to_string(),
                session_id: session_id.as_str().to_string(),
            }),
            Notification::RoomJoined {
                name,
                room_id,
                session_id,
            } => Self::JoinedRoom(dto::RoomAckMessage {
                name: name.as_str().to_string(),
                room_id: room_id.as_str().to_string(),
                session_id: session_id.as_str().to_string(),
            }),
            Notification::RoomUpdated(room) => Self::RoomUpdate(room.as_ref().into()),
            Notification::GameStatus(room) => Self::GameStatusUpdate(room.as_ref().into()),
            Notification::MovePlayed {
                played_cells: cells,
                played_by,
            } => Self::OnUserSelected(dto::UserSelectedMessage {
                completed_cells: played_cells(cells),
                played_by: played_by.to_string(),
            }),
            Notification::GameRestarted => Self::RestartGame,
            Notification::Alert { message, severity } => Self::Alert(dto::AlertMessage {
                message: message.clone(),
                severity: severity_label(*severity).to_string(),
            }),
            Notification::Redirect { path } => Self::Redirect(path.clone()),
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            status: room.status().as_str().to_string(),
            players: [Some(room.player1()), room.player2()]
                .into_iter()
                .flatten()
                .map(|p| p.name.as_str().to_string())
                .collect(),
            created_at: to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        let (winner, _) = outcome(room);
        let players = [room.player1()]
            .into_iter()
            .map(|p| (p, "player1"))
            .chain(room.player2().map(|p| (p, "player2")))
            .map(|(p, slot)| http::PlayerDetailDto {
                slot: slot.to_string(),
                name: p.name.as_str().to_string(),
                online: p.online,
            })
            .collect();
        Self {
            id: room.id.as_str().to_string(),
            status: room.status().as_str().to_string(),
            players,
            played_cells: room
                .played_cells()
                .iter()
                .map(|p| format!("{}:{}", p.cell, p.slot))
                .collect(),
            turn: turn(room),
            winner,
            created_at: to_jst_rfc3339(room.created_at.value()),
        }
    }
}
