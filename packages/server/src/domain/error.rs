//! ドメイン層のエラー型

use thiserror::Error;

use super::value_object::CellId;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("player name is too long ({0} characters)")]
    PlayerNameTooLong(usize),

    #[error("room code must not be empty")]
    EmptyRoomId,

    #[error("invalid room code: '{0}'")]
    InvalidRoomId(String),

    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("invalid connection id: '{0}'")]
    InvalidConnectionId(String),

    #[error("invalid cell id: '{0}'")]
    InvalidCellId(String),

    #[error("invalid player slot: '{0}'")]
    InvalidPlayerSlot(String),
}

/// Room エンティティの操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// player2 の席が既に埋まっている
    #[error("room is full")]
    Full,

    /// player1 以外からのリスタート要求
    #[error("only the room owner can restart the game")]
    Forbidden,

    /// 破棄済みのルーム
    #[error("room is closed")]
    Closed,

    /// セッションがこのルームの席に紐付いていない
    #[error("session is not seated in this room")]
    SessionMismatch,

    /// より新しい接続が既にセッションを引き継いでいる
    #[error("session has been resumed by a newer connection")]
    Superseded,
}

/// 着手が拒否された理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("you are not a player in this room")]
    NotAPlayer,

    #[error("waiting for an opponent to join")]
    WaitingForOpponent,

    #[error("your opponent is offline")]
    OpponentOffline,

    #[error("the game is already finished")]
    GameFinished,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("cell {0} is already taken")]
    CellOccupied(CellId),

    #[error("the move could not be determined from the request")]
    Ambiguous,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// ルームコードの空きがない
    #[error("room capacity exceeded ({capacity} rooms)")]
    CapacityExceeded { capacity: usize },

    #[error("session not found: {0}")]
    SessionNotFound(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client not found: {0}")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
