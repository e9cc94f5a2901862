//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - 作成者が player1 として着席し、セッションが席に紐付くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム作成と created-room / room-update / game-status-update の通知
//! - 異常系：空白のみの名前、着席済みの接続からの作成、コード空間の枯渇

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, Player, PlayerName, PlayerSlot, RepositoryError,
    RoomId, RoomRepository, SessionBinding, SessionId, SessionRepository,
};

use super::{error::CreateRoomError, notify};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CreateRoomUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            rooms,
            sessions,
            message_pusher,
        }
    }

    /// ルームを作成し、要求者を player1 として着席させる
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 割り当てたルームコード
    /// * `Err(CreateRoomError)` - 入力不正・着席済み・コード枯渇
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: String,
    ) -> Result<RoomId, CreateRoomError> {
        let name = PlayerName::try_from(name)?;
        let session_id = match self.sessions.session_of(&connection_id).await {
            Some(session_id) => session_id,
            None => self.sessions.issue(connection_id).await,
        };
        if self.sessions.binding_of(&session_id).await.is_some() {
            return Err(CreateRoomError::AlreadyInRoom);
        }

        open_room(
            self.rooms.as_ref(),
            self.sessions.as_ref(),
            self.message_pusher.as_ref(),
            connection_id,
            session_id,
            name,
            None,
        )
        .await
        .map_err(|_| CreateRoomError::Capacity)
    }
}

/// ルームを登録して player1 を着席させ、作成者へ通知する
///
/// 再接続時にルームが既に破棄されていた場合の作り直しにも使う。
pub(super) async fn open_room(
    rooms: &dyn RoomRepository,
    sessions: &dyn SessionRepository,
    message_pusher: &dyn MessagePusher,
    connection_id: ConnectionId,
    session_id: SessionId,
    name: PlayerName,
    preferred: Option<RoomId>,
) -> Result<RoomId, RepositoryError> {
    let player = Player::new(session_id.clone(), connection_id, name.clone());
    let shared = match rooms.create_room(player, preferred).await {
        Ok(shared) => shared,
        Err(e) => {
            tracing::error!("Failed to create room for '{}': {}", connection_id, e);
            return Err(e);
        }
    };

    let room = shared.lock().await;
    sessions
        .bind(
            &session_id,
            SessionBinding {
                room_id: room.id.clone(),
                slot: PlayerSlot::Player1,
            },
        )
        .await;
    tracing::info!(
        "Room '{}' created by '{}' ({})",
        room.id,
        name,
        connection_id
    );

    notify::push(
        message_pusher,
        &connection_id,
        &Notification::RoomCreated {
            name,
            room_id: room.id.clone(),
            session_id,
        },
    )
    .await;
    notify::announce_room(message_pusher, &room).await;

    Ok(room.id.clone())
}
