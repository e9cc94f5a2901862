//! UseCase: 着手処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitMoveUseCase::execute() メソッド
//! - 手番・空きマス・対局状態の検証と、勝敗・引き分けの確定
//!
//! ### どのような状況を想定しているか
//! - 正常系：セル指定での着手、旧形式（盤面全量）からの着手、勝利と引き分け
//! - 異常系：手番違い、使用済みのマス、差分が 1 手でない旧形式の要求、存在しないルーム

use std::sync::Arc;

use crate::domain::{
    CellId, ConnectionId, Evaluation, MessagePusher, MoveRejection, Notification, PlayedCell, Room,
    RoomId, RoomRepository, Severity,
};

use super::{error::SubmitMoveError, notify};

/// 着手の指定方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRequest {
    /// 着手するマス
    Cell(CellId),
    /// クライアントが保持する盤面の全量（サーバの盤面にない 1 手を着手とみなす）
    History(Vec<PlayedCell>),
}

impl MoveRequest {
    fn resolve(&self, room: &Room) -> Result<CellId, MoveRejection> {
        match self {
            Self::Cell(cell) => Ok(*cell),
            Self::History(history) => {
                let mut fresh = history
                    .iter()
                    .map(|played| played.cell)
                    .filter(|cell| !room.played_cells().iter().any(|p| p.cell == *cell));
                match (fresh.next(), fresh.next()) {
                    (Some(cell), None) => Ok(cell),
                    _ => Err(MoveRejection::Ambiguous),
                }
            }
        }
    }
}

/// 着手のユースケース
pub struct SubmitMoveUseCase {
    rooms: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SubmitMoveUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// 着手を検証して盤面に反映する
    ///
    /// 拒否した場合は盤面を変更せず、要求者にだけ現在の盤面を送り直す。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: String,
        request: MoveRequest,
    ) -> Result<Evaluation, SubmitMoveError> {
        let room_id = RoomId::try_from(room_id)?;
        let shared = self
            .rooms
            .get_room(&room_id)
            .await
            .ok_or_else(|| SubmitMoveError::NotFound(room_id.clone()))?;

        let mut room = shared.lock().await;
        if room.is_closed() {
            return Err(SubmitMoveError::NotFound(room_id));
        }

        let result = request
            .resolve(&room)
            .and_then(|cell| room.play(connection_id, cell));
        let evaluation = match result {
            Ok(evaluation) => evaluation,
            Err(rejection) => {
                tracing::warn!(
                    "Move from '{}' in room '{}' rejected: {}",
                    connection_id,
                    room_id,
                    rejection
                );
                if room.slot_of(connection_id).is_some() {
                    notify::push(
                        self.message_pusher.as_ref(),
                        &connection_id,
                        &Notification::game_status(&room),
                    )
                    .await;
                }
                return Err(SubmitMoveError::Rejected(rejection));
            }
        };
        tracing::debug!(
            "Room '{}': move #{} by '{}'",
            room_id,
            room.played_cells().len(),
            connection_id
        );

        let pusher = self.message_pusher.as_ref();
        notify::broadcast(
            pusher,
            &room.online_connections_except(connection_id),
            &Notification::MovePlayed {
                played_cells: room.played_cells().to_vec(),
                played_by: connection_id,
            },
        )
        .await;
        let everyone = room.online_connections();
        notify::broadcast(pusher, &everyone, &Notification::game_status(&room)).await;

        if let Some(announcement) = announcement(&room, evaluation) {
            tracing::info!("Room '{}' finished: {:?}", room_id, evaluation);
            notify::broadcast(pusher, &everyone, &announcement).await;
        }

        Ok(evaluation)
    }
}

/// 対局終了時の結果通知
fn announcement(room: &Room, evaluation: Evaluation) -> Option<Notification> {
    match evaluation {
        Evaluation::Ongoing => None,
        Evaluation::Win { slot, .. } => {
            let winner = room
                .player(slot)
                .map(|p| p.name.to_string())
                .unwrap_or_else(|| slot.to_string());
            Some(Notification::alert(
                format!("{winner} won the game!"),
                Severity::Success,
            ))
        }
        Evaluation::Draw => Some(Notification::alert(
            "The game ended in a draw",
            Severity::Info,
        )),
    }
}
