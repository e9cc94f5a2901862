//! UseCase 層
//!
//! 1 操作につき 1 つのユースケース。ルームの変更はすべてルームの Mutex を保持した
//! まま行い、通知もその間に送る（同じルームの通知順序が入れ替わらない）。

pub mod connect_client;
pub mod create_room;
pub mod disconnect_player;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
mod notify;
pub mod restart_game;
pub mod submit_move;

#[cfg(test)]
mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_player::{DisconnectOutcome, DisconnectPlayerUseCase};
pub use error::{
    CreateRoomError, GetRoomDetailError, JoinRoomError, RestartGameError, SubmitMoveError,
};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use restart_game::RestartGameUseCase;
pub use submit_move::{MoveRequest, SubmitMoveUseCase};
