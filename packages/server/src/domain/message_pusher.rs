//! MessagePusher trait 定義
//!
//! 接続中のクライアントへ通知を届けるためのインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// クライアントの送信キュー（シリアライズ済みのフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 通知の送信口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続へ通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続へ通知を送信（一部の失敗は許容する）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
