//! クライアントへ通知するドメインイベント
//!
//! ワイヤ形式への変換は Infrastructure 層（DTO）が担当する。

use super::{
    entity::{PlayedCell, Room},
    value_object::{ConnectionId, PlayerName, RoomId, SessionId},
};

/// トースト通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// クライアントへの通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// 接続直後に払い出したセッション
    SessionIssued {
        session_id: SessionId,
        connection_id: ConnectionId,
    },
    /// ルーム作成の応答（作成者のみ）
    RoomCreated {
        name: PlayerName,
        room_id: RoomId,
        session_id: SessionId,
    },
    /// 参加・再接続の応答
    RoomJoined {
        name: PlayerName,
        room_id: RoomId,
        session_id: SessionId,
    },
    /// メンバー構成の変化
    RoomUpdated(Box<Room>),
    /// 盤面と状態の全量
    GameStatus(Box<Room>),
    /// 相手の着手
    MovePlayed {
        played_cells: Vec<PlayedCell>,
        played_by: ConnectionId,
    },
    GameRestarted,
    Alert {
        message: String,
        severity: Severity,
    },
    Redirect {
        path: String,
    },
}

impl Notification {
    pub fn alert(message: impl Into<String>, severity: Severity) -> Self {
        Self::Alert {
            message: message.into(),
            severity,
        }
    }

    /// ホーム画面への強制遷移
    pub fn redirect_home() -> Self {
        Self::Redirect {
            path: "/".to_string(),
        }
    }

    pub fn room_updated(room: &Room) -> Self {
        Self::RoomUpdated(Box::new(room.clone()))
    }

    pub fn game_status(room: &Room) -> Self {
        Self::GameStatus(Box::new(room.clone()))
    }
}
