//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub status: String,
    /// Names of seated players, player1 first.
    pub players: Vec<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDetailDto {
    pub slot: String,
    pub name: String,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub status: String,
    pub players: Vec<PlayerDetailDto>,
    pub played_cells: Vec<String>,
    pub turn: Option<String>,
    pub winner: Option<String>,
    pub created_at: Option<String>,
}
