//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ドメインの通知を DTO（JSON）に変換して送信（push_to, broadcast）
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われ、
//! ここでは生成済みの sender を受け取って送信にだけ使う。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中の接続数
    pub async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(notification))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                    } else {
                        tracing::debug!("Broadcasted message to connection '{}'", target);
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信（JSON フレーム）
    // - broadcast: 複数接続への送信と部分失敗の許容
    // - 登録解除後は送信されないこと
    // ========================================

    fn alert() -> Notification {
        Notification::alert("hello", Severity::Info)
    }

    const ALERT_JSON: &str = r#"{"event":"alert","data":{"message":"hello","severity":"info"}}"#;

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON フレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::new(1);
        pusher.register_client(connection, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection, &alert()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await.as_deref(), Some(ALERT_JSON));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        let pusher = WebSocketMessagePusher::new();

        let result = pusher.push_to(&ConnectionId::new(9), &alert()).await;

        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        pusher.register_client(ConnectionId::new(1), tx).await;

        let result = pusher.push_to(&ConnectionId::new(1), &alert()).await;

        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(ConnectionId::new(1), tx1).await;
        pusher.register_client(ConnectionId::new(2), tx2).await;

        // when (操作):
        let targets = [
            ConnectionId::new(1),
            ConnectionId::new(2),
            ConnectionId::new(3),
        ];
        let result = pusher.broadcast(&targets, &alert()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await.as_deref(), Some(ALERT_JSON));
        assert_eq!(rx2.recv().await.as_deref(), Some(ALERT_JSON));
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除した接続には送信されない
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(ConnectionId::new(1), tx).await;

        pusher.unregister_client(&ConnectionId::new(1)).await;

        assert_eq!(pusher.count_clients().await, 0);
        assert!(
            pusher
                .push_to(&ConnectionId::new(1), &alert())
                .await
                .is_err()
        );
    }
}
