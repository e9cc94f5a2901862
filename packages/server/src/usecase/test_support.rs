//! UseCase テスト用のフィクスチャ

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel, Room, RoomId,
        RoomRepository, SessionId,
    },
    infrastructure::repository::{InMemoryRoomRepository, InMemorySessionRepository},
};
use sanmoku_shared::time::FixedClock;

use super::{
    ConnectClientUseCase, CreateRoomUseCase, DisconnectPlayerUseCase, GetRoomDetailUseCase,
    GetRoomsUseCase, JoinRoomUseCase, RestartGameUseCase, SubmitMoveUseCase,
};

/// 送信された通知を記録するだけの MessagePusher
#[derive(Default)]
pub struct RecordingPusher {
    sent: Mutex<Vec<(ConnectionId, Notification)>>,
}

impl RecordingPusher {
    /// 指定した接続へ送られた通知（送信順）
    pub async fn sent_to(&self, connection_id: ConnectionId) -> Vec<Notification> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(id, _)| *id == connection_id)
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, _connection_id: &ConnectionId) {}

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .await
            .push((*connection_id, notification.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let mut sent = self.sent.lock().await;
        for target in targets {
            sent.push((*target, notification.clone()));
        }
        Ok(())
    }
}

/// 全ユースケースを同じリポジトリで組み立てたもの
pub struct Fixture {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub pusher: Arc<RecordingPusher>,
    pub connect_client: ConnectClientUseCase,
    pub create: CreateRoomUseCase,
    pub join: JoinRoomUseCase,
    pub submit: SubmitMoveUseCase,
    pub restart: RestartGameUseCase,
    pub disconnect: DisconnectPlayerUseCase,
    pub get_rooms: GetRoomsUseCase,
    pub get_room_detail: GetRoomDetailUseCase,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(4, 10_000, Duration::ZERO)
    }

    pub fn with_limits(code_length: usize, max_rooms: usize) -> Self {
        Self::build(code_length, max_rooms, Duration::ZERO)
    }

    pub fn with_grace(grace: Duration) -> Self {
        Self::build(4, 10_000, grace)
    }

    fn build(code_length: usize, max_rooms: usize, grace: Duration) -> Self {
        let rooms = Arc::new(InMemoryRoomRepository::new(
            code_length,
            max_rooms,
            Arc::new(FixedClock::new(1000)),
        ));
        let sessions = Arc::new(InMemorySessionRepository::new());
        let pusher = Arc::new(RecordingPusher::default());

        Self {
            connect_client: ConnectClientUseCase::new(sessions.clone(), pusher.clone()),
            create: CreateRoomUseCase::new(rooms.clone(), sessions.clone(), pusher.clone()),
            join: JoinRoomUseCase::new(rooms.clone(), sessions.clone(), pusher.clone()),
            submit: SubmitMoveUseCase::new(rooms.clone(), pusher.clone()),
            restart: RestartGameUseCase::new(rooms.clone(), pusher.clone()),
            disconnect: DisconnectPlayerUseCase::new(
                rooms.clone(),
                sessions.clone(),
                pusher.clone(),
                grace,
            ),
            get_rooms: GetRoomsUseCase::new(rooms.clone()),
            get_room_detail: GetRoomDetailUseCase::new(rooms.clone()),
            rooms,
            sessions,
            pusher,
        }
    }

    /// 新しい接続を開く（送信キューは使わない）
    pub async fn connect(&self) -> (ConnectionId, SessionId) {
        let (sender, _receiver) = mpsc::unbounded_channel();
        self.connect_client.execute(sender).await
    }

    /// Alice が作成し Bob が参加した対局中のルーム（記録済みの通知は消す）
    pub async fn seat_two(&self) -> (RoomId, ConnectionId, ConnectionId) {
        let (alice, _) = self.connect().await;
        let (bob, _) = self.connect().await;
        let room_id = self
            .create
            .execute(alice, "Alice".to_string())
            .await
            .unwrap();
        self.join
            .execute(bob, "Bob".to_string(), room_id.to_string(), None)
            .await
            .unwrap();
        self.pusher.clear().await;
        (room_id, alice, bob)
    }

    /// ルームの現在の状態
    pub async fn room(&self, room_id: &RoomId) -> Room {
        let shared = self.rooms.get_room(room_id).await.unwrap();
        let room = shared.lock().await;
        room.clone()
    }
}
