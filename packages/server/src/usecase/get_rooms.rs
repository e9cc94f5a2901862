//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// 稼働中のルームのスナップショット（コード順、破棄処理中のものは除く）
    pub async fn execute(&self) -> Vec<Room> {
        let mut snapshots = Vec::new();
        for shared in self.rooms.list_rooms().await {
            let room = shared.lock().await;
            if !room.is_closed() {
                snapshots.push(room.clone());
            }
        }
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;

    #[tokio::test]
    async fn test_get_rooms_lists_live_rooms() {
        // テスト項目: 稼働中のルームがすべて返され、破棄したルームは含まれない
        // given (前提条件):
        let fixture = Fixture::new();
        let (first, _, _) = fixture.seat_two().await;
        let (carol, _) = fixture.connect().await;
        let second = fixture
            .create
            .execute(carol, "Carol".to_string())
            .await
            .unwrap();
        fixture.disconnect.execute(carol).await;

        // when (操作):
        let rooms = fixture.get_rooms.execute().await;

        // then (期待する結果):
        let ids: Vec<_> = rooms.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![first]);
        assert!(!ids.contains(&second));
    }
}
