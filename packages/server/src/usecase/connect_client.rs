//! UseCase: クライアント接続処理（セッション払い出し）

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::domain::{
    ConnectionId, MessagePusher, Notification, PusherChannel, SessionId, SessionRepository,
};

use super::notify;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 最後に払い出した接続番号
    last_sequence: AtomicU64,
}

impl ConnectClientUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
            last_sequence: AtomicU64::new(0),
        }
    }

    /// 接続 ID を割り当て、送信キューを登録し、セッションを払い出す
    ///
    /// 払い出したセッションは `session` イベントでクライアントに通知する。
    pub async fn execute(&self, sender: PusherChannel) -> (ConnectionId, SessionId) {
        let sequence = self.last_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let connection_id = ConnectionId::new(sequence);

        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        let session_id = self.sessions.issue(connection_id).await;

        notify::push(
            self.message_pusher.as_ref(),
            &connection_id,
            &Notification::SessionIssued {
                session_id: session_id.clone(),
                connection_id,
            },
        )
        .await;
        tracing::info!("Connection '{}' opened", connection_id);

        (connection_id, session_id)
    }
}
