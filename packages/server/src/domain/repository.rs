//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ConnectionId, Player, PlayerSlot, RepositoryError, Room, RoomId, SessionId};

/// ルームごとの排他区間
///
/// ルームを変更する操作はすべてこの Mutex を取得してから行う（ルーム単位の単一書き込み）。
/// 異なるルーム同士は互いに待たない。
pub type SharedRoom = Arc<Mutex<Room>>;

/// Room Repository trait（ルームレジストリ）
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 一意なルームコードを割り当ててルームを作成
    ///
    /// `preferred` が空いていればそのコードを使う。
    async fn create_room(
        &self,
        player1: Player,
        preferred: Option<RoomId>,
    ) -> Result<SharedRoom, RepositoryError>;

    /// ルームを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<SharedRoom>;

    /// ルームを削除（コードは再利用可能になる）
    async fn remove_room(&self, room_id: &RoomId) -> bool;

    /// 全ルームを取得（コード順）
    async fn list_rooms(&self) -> Vec<SharedRoom>;

    /// ルーム数を取得
    async fn count_rooms(&self) -> usize;
}

/// セッションが紐付いている席
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub room_id: RoomId,
    pub slot: PlayerSlot,
}

/// Session Repository trait（セッションバインダ）
///
/// セッション ID → 席、接続 ID → セッション ID の対応を保持する。
/// 席の正しさ（どの接続が最新か）は Room 側で検証する。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 新しい接続にセッションを払い出す
    async fn issue(&self, connection_id: ConnectionId) -> SessionId;

    /// 接続に対応するセッション
    async fn session_of(&self, connection_id: &ConnectionId) -> Option<SessionId>;

    /// セッションの席
    async fn binding_of(&self, session_id: &SessionId) -> Option<SessionBinding>;

    /// セッションを席に紐付ける（未知のセッションなら登録する）
    async fn bind(&self, session_id: &SessionId, binding: SessionBinding);

    /// 再接続後、接続をセッションに紐付け直す
    ///
    /// 以前の接続の対応と、新しい接続に払い出した未使用のセッションは破棄する。
    async fn attach_connection(
        &self,
        session_id: &SessionId,
        connection_id: ConnectionId,
    ) -> Result<(), RepositoryError>;

    /// 切断した接続の対応を削除
    ///
    /// 席に紐付いていないセッションは破棄し、紐付いているものは再接続のために残す。
    async fn release_connection(&self, connection_id: &ConnectionId) -> Option<SessionId>;

    /// 破棄するルームの席のセッションを削除
    ///
    /// 指定したセッションのうち、まだ `room_id` の席に紐付いているものだけを削除する。
    async fn forget_sessions(&self, room_id: &RoomId, session_ids: &[SessionId]);
}
