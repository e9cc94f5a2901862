//! サーバ設定と依存関係の組み立て

use std::{sync::Arc, time::Duration};

use crate::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryRoomRepository, InMemorySessionRepository},
    },
    ui::state::AppState,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectPlayerUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, RestartGameUseCase, SubmitMoveUseCase,
    },
};
use sanmoku_shared::time::SystemClock;

pub const DEFAULT_ROOM_CODE_LENGTH: usize = 4;
pub const DEFAULT_MAX_ROOMS: usize = 10_000;

/// サーバ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 切断からオフライン扱いにするまでの猶予（0 なら即時）
    pub reconnect_grace: Duration,
    pub room_code_length: usize,
    pub max_rooms: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            reconnect_grace: Duration::ZERO,
            room_code_length: DEFAULT_ROOM_CODE_LENGTH,
            max_rooms: DEFAULT_MAX_ROOMS,
        }
    }
}

impl ServerConfig {
    /// 依存関係を組み立てる
    ///
    /// 1. Repository
    /// 2. MessagePusher
    /// 3. UseCases
    pub fn build_state(&self) -> AppState {
        // 1. Create Repositories (in-memory database)
        let rooms = Arc::new(InMemoryRoomRepository::new(
            self.room_code_length,
            self.max_rooms,
            Arc::new(SystemClock),
        ));
        let sessions = Arc::new(InMemorySessionRepository::new());
        tracing::info!(
            "Room registry ready: code length {}, capacity {}",
            self.room_code_length,
            rooms.capacity()
        );

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 3. Create UseCases
        AppState {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                sessions.clone(),
                message_pusher.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                rooms.clone(),
                sessions.clone(),
                message_pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                rooms.clone(),
                sessions.clone(),
                message_pusher.clone(),
            )),
            submit_move_usecase: Arc::new(SubmitMoveUseCase::new(
                rooms.clone(),
                message_pusher.clone(),
            )),
            restart_game_usecase: Arc::new(RestartGameUseCase::new(
                rooms.clone(),
                message_pusher.clone(),
            )),
            disconnect_player_usecase: Arc::new(DisconnectPlayerUseCase::new(
                rooms.clone(),
                sessions.clone(),
                message_pusher.clone(),
                self.reconnect_grace,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(rooms)),
            message_pusher,
        }
    }
}
