//! UseCase: プレイヤー切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPlayerUseCase::execute() メソッド
//! - 切断したプレイヤーのオフライン化と、無人になったルームの破棄
//!
//! ### なぜこのテストが必要か
//! - 残ったプレイヤーに相手の離脱が通知されることを保証
//! - 再接続の猶予中に席が引き継がれた場合、オフラインにしないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：片方の切断（ルームは残る）、両方の切断（ルームは破棄）
//! - エッジケース：猶予中の再接続、着席していない接続の切断

use std::{sync::Arc, time::Duration};

use crate::domain::{
    ConnectionId, MessagePusher, Notification, RoomId, RoomRepository, SessionRepository,
    Severity,
};

use super::notify;

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// ルームに着席していなかった
    NotSeated,
    /// 猶予中に別の接続が席を引き継いだ
    Resumed,
    /// プレイヤーをオフラインにした（ルームは残る）
    MarkedOffline(RoomId),
    /// 誰もいなくなったルームを破棄した
    RoomClosed(RoomId),
}

/// プレイヤー切断のユースケース
pub struct DisconnectPlayerUseCase {
    rooms: Arc<dyn RoomRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    /// オフラインにするまでの再接続猶予
    grace: Duration,
}

impl DisconnectPlayerUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        grace: Duration,
    ) -> Self {
        Self {
            rooms,
            sessions,
            message_pusher,
            grace,
        }
    }

    /// 接続の切断を処理する
    ///
    /// 送信キューはすぐに登録解除する。席のオフライン化は猶予期間の後に行い、
    /// その時点で席が別の接続に引き継がれていれば何もしない。
    pub async fn execute(&self, connection_id: ConnectionId) -> DisconnectOutcome {
        self.message_pusher.unregister_client(&connection_id).await;

        let binding = match self.sessions.session_of(&connection_id).await {
            Some(session_id) => self.sessions.binding_of(&session_id).await,
            None => None,
        };
        let Some(binding) = binding else {
            self.sessions.release_connection(&connection_id).await;
            tracing::info!("Connection '{}' closed", connection_id);
            return DisconnectOutcome::NotSeated;
        };

        if !self.grace.is_zero() {
            tokio::time::sleep(self.grace).await;
        }

        let Some(shared) = self.rooms.get_room(&binding.room_id).await else {
            self.sessions.release_connection(&connection_id).await;
            return DisconnectOutcome::NotSeated;
        };

        let mut room = shared.lock().await;
        let Some(slot) = room.mark_offline(connection_id) else {
            self.sessions.release_connection(&connection_id).await;
            tracing::info!(
                "Connection '{}' closed after its seat was resumed",
                connection_id
            );
            return DisconnectOutcome::Resumed;
        };

        if room.is_abandoned() {
            // 席のセッションはルームの排他区間内で、コードを解放する前に破棄する
            room.close();
            let room_id = room.id.clone();
            self.sessions
                .forget_sessions(&room_id, &room.session_ids())
                .await;
            self.sessions.release_connection(&connection_id).await;
            self.rooms.remove_room(&room_id).await;
            drop(room);

            tracing::info!("Room '{}' closed: no player left online", room_id);
            return DisconnectOutcome::RoomClosed(room_id);
        }

        self.sessions.release_connection(&connection_id).await;
        let name = room
            .player(slot)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|| slot.to_string());
        tracing::info!(
            "'{}' ({}) went offline in room '{}'",
            name,
            connection_id,
            room.id
        );

        let pusher = self.message_pusher.as_ref();
        notify::announce_room(pusher, &room).await;
        notify::broadcast(
            pusher,
            &room.online_connections(),
            &Notification::alert(format!("{name} left the game"), Severity::Warning),
        )
        .await;

        DisconnectOutcome::MarkedOffline(room.id.clone())
    }
}
