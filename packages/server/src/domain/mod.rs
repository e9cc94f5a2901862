//! ドメイン層
//!
//! 対局ルールとルーム・セッションのモデル、および外部依存のインターフェース。

pub mod board;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use board::{Evaluation, WINNING_LINES, evaluate};
pub use entity::{PlayedCell, Player, Room, RoomStatus};
pub use error::{MessagePushError, MoveRejection, RepositoryError, RoomError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use notification::{Notification, Severity};
pub use repository::{RoomRepository, SessionBinding, SessionRepository, SharedRoom};
pub use value_object::{
    CellId, ConnectionId, PlayerName, PlayerSlot, RoomId, RoomIdFactory, SessionId, Timestamp,
};
