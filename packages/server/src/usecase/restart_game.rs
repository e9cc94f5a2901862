//! UseCase: リスタート処理

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, RoomError, RoomId, RoomRepository,
};

use super::{error::RestartGameError, notify};

/// リスタートのユースケース
pub struct RestartGameUseCase {
    rooms: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RestartGameUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// 盤面をクリアして新しい対局を始める（player1 のみ）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: String,
    ) -> Result<(), RestartGameError> {
        let room_id = RoomId::try_from(room_id)?;
        let shared = self
            .rooms
            .get_room(&room_id)
            .await
            .ok_or_else(|| RestartGameError::NotFound(room_id.clone()))?;

        let mut room = shared.lock().await;
        match room.restart(connection_id) {
            Ok(()) => {}
            Err(RoomError::Forbidden) => {
                tracing::warn!(
                    "'{}' is not allowed to restart room '{}'",
                    connection_id,
                    room_id
                );
                return Err(RestartGameError::Forbidden);
            }
            Err(_) => return Err(RestartGameError::NotFound(room_id)),
        }
        tracing::info!("Room '{}' restarted by '{}'", room_id, connection_id);

        let everyone = room.online_connections();
        let pusher = self.message_pusher.as_ref();
        notify::broadcast(pusher, &everyone, &Notification::GameRestarted).await;
        notify::broadcast(pusher, &everyone, &Notification::game_status(&room)).await;

        Ok(())
    }
}
