//! UseCase 層のエラー型
//!
//! 要求単位・ルーム単位のエラーで、サービス全体を止めるものはない。

use thiserror::Error;

use crate::domain::{MoveRejection, RoomId, ValueObjectError};

/// ルーム作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("connection is already seated in a room")]
    AlreadyInRoom,

    #[error("no room code available")]
    Capacity,
}

/// ルーム参加・再接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("connection is already seated in a room")]
    AlreadyInRoom,

    #[error("room '{0}' not found")]
    NotFound(RoomId),

    #[error("room '{0}' is full")]
    Full(RoomId),

    #[error("session has been resumed by a newer connection")]
    Superseded,

    #[error("no room code available")]
    Capacity,
}

/// 着手のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitMoveError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("room '{0}' not found")]
    NotFound(RoomId),

    #[error("move rejected: {0}")]
    Rejected(MoveRejection),
}

/// リスタートのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestartGameError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("room '{0}' not found")]
    NotFound(RoomId),

    #[error("only the room owner can restart the game")]
    Forbidden,
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
