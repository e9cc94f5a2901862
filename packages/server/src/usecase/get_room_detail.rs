//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// ルームのスナップショットを取得（コードが不正な場合も RoomNotFound）
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::try_from(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        let shared = self
            .rooms
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)?;

        let room = shared.lock().await;
        if room.is_closed() {
            return Err(GetRoomDetailError::RoomNotFound);
        }
        Ok(room.clone())
    }
}
