//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! マップ自体のロックはハンドル（`SharedRoom`）の出し入れの間だけ保持し、
//! ルームの変更はルームごとの Mutex で直列化します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    Player, RepositoryError, Room, RoomId, RoomIdFactory, RoomRepository, SharedRoom, Timestamp,
};
use sanmoku_shared::time::Clock;

/// ランダム生成でコードの衝突が続いたときに諦めるまでの試行回数
const MAX_CODE_ATTEMPTS: usize = 64;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomId, SharedRoom>>,
    /// 生成するルームコードの長さ
    code_length: usize,
    /// 同時に存在できるルーム数の上限
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    ///
    /// 実際の上限は `max_rooms` とコード空間の小さい方になる。
    pub fn new(code_length: usize, max_rooms: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            code_length,
            capacity: max_rooms.min(RoomIdFactory::code_space(code_length)),
            clock,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 使用中でないコードを選ぶ
    fn pick_code(
        &self,
        rooms: &HashMap<RoomId, SharedRoom>,
        preferred: Option<RoomId>,
    ) -> Option<RoomId> {
        if let Some(code) = preferred
            && !rooms.contains_key(&code)
        {
            return Some(code);
        }
        (0..MAX_CODE_ATTEMPTS)
            .map(|_| RoomIdFactory::generate(self.code_length))
            .find(|code| !rooms.contains_key(code))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        player1: Player,
        preferred: Option<RoomId>,
    ) -> Result<SharedRoom, RepositoryError> {
        let mut rooms = self.rooms.write().await;
        let exhausted = RepositoryError::CapacityExceeded {
            capacity: self.capacity,
        };
        if rooms.len() >= self.capacity {
            return Err(exhausted);
        }
        let room_id = self.pick_code(&rooms, preferred).ok_or(exhausted)?;

        let room = Room::new(
            room_id.clone(),
            player1,
            Timestamp::new(self.clock.now_millis()),
        );
        let shared = Arc::new(Mutex::new(room));
        rooms.insert(room_id.clone(), shared.clone());
        tracing::debug!("Room '{}' registered ({} live)", room_id, rooms.len());

        Ok(shared)
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<SharedRoom> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    async fn remove_room(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        let removed = rooms.remove(room_id).is_some();
        if removed {
            tracing::debug!("Room '{}' removed ({} live)", room_id, rooms.len());
        }
        removed
    }

    async fn list_rooms(&self) -> Vec<SharedRoom> {
        let rooms = self.rooms.read().await;
        let mut entries: Vec<_> = rooms.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, room)| room.clone()).collect()
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.read().await.len()
    }
}
