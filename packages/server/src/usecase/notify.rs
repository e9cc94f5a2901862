//! 通知送信の共通処理
//!
//! 通知の失敗はログに残すだけで、呼び出し元の操作は失敗させない。

use crate::domain::{ConnectionId, MessagePusher, Notification, Room};

pub(super) async fn push(
    pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    notification: &Notification,
) {
    if let Err(e) = pusher.push_to(connection_id, notification).await {
        tracing::warn!("Failed to notify '{}': {}", connection_id, e);
    }
}

pub(super) async fn broadcast(
    pusher: &dyn MessagePusher,
    targets: &[ConnectionId],
    notification: &Notification,
) {
    if targets.is_empty() {
        return;
    }
    if let Err(e) = pusher.broadcast(targets, notification).await {
        tracing::warn!("Failed to broadcast to {:?}: {}", targets, e);
    }
}

/// オンラインの全プレイヤーへメンバー構成と盤面を通知
pub(super) async fn announce_room(pusher: &dyn MessagePusher, room: &Room) {
    let targets = room.online_connections();
    broadcast(pusher, &targets, &Notification::room_updated(room)).await;
    broadcast(pusher, &targets, &Notification::game_status(room)).await;
}
