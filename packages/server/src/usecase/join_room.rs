//! UseCase: ルーム参加・再接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 新規参加（player2 の着席）、セッションによる再接続、破棄済みルームの作り直し
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加で対局開始、リロード後の再接続、同じ接続による再要求
//! - 異常系：存在しないルーム、満席、古い接続による再接続、着席済みの接続からの参加

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, Player, PlayerName, PlayerSlot, RoomError, RoomId,
    RoomRepository, SessionBinding, SessionId, SessionRepository, Severity, SharedRoom,
};

use super::{create_room::open_room, error::JoinRoomError, notify};

/// 参加要求の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// player2 として着席した
    Joined(RoomId),
    /// 既存の席に再接続した
    Resumed(RoomId),
    /// ルームが破棄済みだったため、要求者を player1 として作り直した
    Recreated(RoomId),
}

impl JoinOutcome {
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::Joined(id) | Self::Resumed(id) | Self::Recreated(id) => id,
        }
    }
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
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

    /// ルームに参加する
    ///
    /// `old_session` が指定され、そのセッションがこのルームの席に紐付いていれば
    /// 再接続として扱う。空文字は未指定と同じ。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: String,
        room_id: String,
        old_session: Option<String>,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let name = PlayerName::try_from(name)?;
        let room_id = RoomId::try_from(room_id)?;
        let old_session = old_session
            .filter(|s| !s.trim().is_empty())
            .map(SessionId::try_from)
            .transpose()?;

        let current = match self.sessions.session_of(&connection_id).await {
            Some(session_id) => session_id,
            None => self.sessions.issue(connection_id).await,
        };
        if old_session.as_ref() != Some(&current)
            && self.sessions.binding_of(&current).await.is_some()
        {
            return Err(JoinRoomError::AlreadyInRoom);
        }

        if let Some(old) = &old_session
            && let Some(binding) = self.sessions.binding_of(old).await
            && binding.room_id == room_id
            && let Some(shared) = self.rooms.get_room(&room_id).await
            && let Some(outcome) = self
                .try_resume(&shared, connection_id, old, binding.slot)
                .await?
        {
            return Ok(outcome);
        }

        let Some(shared) = self.rooms.get_room(&room_id).await else {
            // 作り直せるのは、払い出し済みの形式のセッションを持つ再接続だけ
            if !old_session.as_ref().is_some_and(SessionId::is_issued_format) {
                tracing::warn!("Room '{}' not found for '{}'", room_id, connection_id);
                return Err(JoinRoomError::NotFound(room_id));
            }
            tracing::info!(
                "Room '{}' no longer exists, recreating it for '{}'",
                room_id,
                connection_id
            );
            return open_room(
                self.rooms.as_ref(),
                self.sessions.as_ref(),
                self.message_pusher.as_ref(),
                connection_id,
                current,
                name,
                Some(room_id),
            )
            .await
            .map(JoinOutcome::Recreated)
            .map_err(|_| JoinRoomError::Capacity);
        };

        let mut room = shared.lock().await;
        let player = Player::new(current.clone(), connection_id, name.clone());
        match room.attach_player2(player) {
            Ok(()) => {}
            Err(RoomError::Full) => {
                tracing::warn!("Room '{}' is full, '{}' rejected", room_id, connection_id);
                return Err(JoinRoomError::Full(room_id));
            }
            Err(_) => return Err(JoinRoomError::NotFound(room_id)),
        }
        self.sessions
            .bind(
                &current,
                SessionBinding {
                    room_id: room_id.clone(),
                    slot: PlayerSlot::Player2,
                },
            )
            .await;
        tracing::info!("'{}' ({}) joined room '{}'", name, connection_id, room_id);

        notify::push(
            self.message_pusher.as_ref(),
            &connection_id,
            &Notification::RoomJoined {
                name,
                room_id: room_id.clone(),
                session_id: current,
            },
        )
        .await;
        notify::announce_room(self.message_pusher.as_ref(), &room).await;

        Ok(JoinOutcome::Joined(room_id))
    }

    /// 席に新しい接続を紐付け直す
    ///
    /// ルームが破棄済み、または席のセッションが一致しない場合は `None`
    /// （新規参加として続行する）。
    async fn try_resume(
        &self,
        shared: &SharedRoom,
        connection_id: ConnectionId,
        session_id: &SessionId,
        slot: PlayerSlot,
    ) -> Result<Option<JoinOutcome>, JoinRoomError> {
        let mut room = shared.lock().await;
        let previous = match room.rebind(slot, session_id, connection_id) {
            Ok(previous) => previous,
            Err(RoomError::Superseded) => {
                tracing::warn!(
                    "'{}' tried to resume a session already taken over in room '{}'",
                    connection_id,
                    room.id
                );
                return Err(JoinRoomError::Superseded);
            }
            Err(_) => return Ok(None),
        };
        if let Err(e) = self
            .sessions
            .attach_connection(session_id, connection_id)
            .await
        {
            tracing::warn!("Failed to attach '{}': {}", connection_id, e);
        }

        if let Some(previous) = previous {
            notify::push(
                self.message_pusher.as_ref(),
                &previous,
                &Notification::alert(
                    "This seat was taken over by a newer connection",
                    Severity::Warning,
                ),
            )
            .await;
            notify::push(
                self.message_pusher.as_ref(),
                &previous,
                &Notification::redirect_home(),
            )
            .await;
        }

        let name = match room.player(slot) {
            Some(player) => player.name.clone(),
            None => return Ok(None),
        };
        tracing::info!(
            "'{}' resumed {} of room '{}' from '{}'",
            name,
            slot,
            room.id,
            connection_id
        );

        notify::push(
            self.message_pusher.as_ref(),
            &connection_id,
            &Notification::RoomJoined {
                name,
                room_id: room.id.clone(),
                session_id: session_id.clone(),
            },
        )
        .await;
        notify::announce_room(self.message_pusher.as_ref(), &room).await;

        Ok(Some(JoinOutcome::Resumed(room.id.clone())))
    }
}
