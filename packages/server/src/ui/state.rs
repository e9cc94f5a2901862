//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectPlayerUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, RestartGameUseCase, SubmitMoveUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub submit_move_usecase: Arc<SubmitMoveUseCase>,
    pub restart_game_usecase: Arc<RestartGameUseCase>,
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// MessagePusher（エラー応答の送信に使う）
    pub message_pusher: Arc<dyn MessagePusher>,
}
