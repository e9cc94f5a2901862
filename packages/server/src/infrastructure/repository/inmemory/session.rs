//! InMemory Session Repository 実装
//!
//! セッション ID → 席、接続 ID → セッション ID の 2 つの表を 1 つの Mutex で保護する。
//! ルームの Mutex を保持したまま呼ばれることはあるが、逆順（このロックを保持したまま
//! ルームをロックする）は起こらない。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, RepositoryError, RoomId, SessionBinding, SessionId, SessionRepository,
};

#[derive(Debug, Default)]
struct SessionEntry {
    binding: Option<SessionBinding>,
    connection: Option<ConnectionId>,
}

#[derive(Debug, Default)]
struct Tables {
    sessions: HashMap<SessionId, SessionEntry>,
    connections: HashMap<ConnectionId, SessionId>,
}

impl Tables {
    /// 接続の対応を外す。席のないセッションはここで破棄する
    fn detach(&mut self, connection_id: &ConnectionId) -> Option<SessionId> {
        let session_id = self.connections.remove(connection_id)?;
        let unbound = match self.sessions.get_mut(&session_id) {
            Some(entry) => {
                if entry.connection.as_ref() == Some(connection_id) {
                    entry.connection = None;
                }
                entry.binding.is_none()
            }
            None => false,
        };
        if unbound {
            self.sessions.remove(&session_id);
        }
        Some(session_id)
    }
}

/// インメモリ Session Repository 実装
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    tables: Mutex<Tables>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持しているセッション数
    pub async fn count_sessions(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn issue(&self, connection_id: ConnectionId) -> SessionId {
        let session_id = SessionId::generate();
        let mut tables = self.tables.lock().await;
        tables.detach(&connection_id);
        tables.sessions.insert(
            session_id.clone(),
            SessionEntry {
                binding: None,
                connection: Some(connection_id),
            },
        );
        tables.connections.insert(connection_id, session_id.clone());
        session_id
    }

    async fn session_of(&self, connection_id: &ConnectionId) -> Option<SessionId> {
        let tables = self.tables.lock().await;
        tables.connections.get(connection_id).cloned()
    }

    async fn binding_of(&self, session_id: &SessionId) -> Option<SessionBinding> {
        let tables = self.tables.lock().await;
        tables
            .sessions
            .get(session_id)
            .and_then(|entry| entry.binding.clone())
    }

    async fn bind(&self, session_id: &SessionId, binding: SessionBinding) {
        let mut tables = self.tables.lock().await;
        tables
            .sessions
            .entry(session_id.clone())
            .or_default()
            .binding = Some(binding);
    }

    async fn attach_connection(
        &self,
        session_id: &SessionId,
        connection_id: ConnectionId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.sessions.contains_key(session_id) {
            return Err(RepositoryError::SessionNotFound(session_id.to_string()));
        }

        // 新しい接続に払い出されていたセッションを外す（未使用なら破棄される）
        if tables.connections.get(&connection_id) != Some(session_id) {
            tables.detach(&connection_id);
        }

        let previous = tables
            .sessions
            .get_mut(session_id)
            .and_then(|entry| entry.connection.replace(connection_id));
        if let Some(previous) = previous
            && previous != connection_id
        {
            tables.connections.remove(&previous);
        }
        tables
            .connections
            .insert(connection_id, session_id.clone());
        Ok(())
    }

    async fn release_connection(&self, connection_id: &ConnectionId) -> Option<SessionId> {
        let mut tables = self.tables.lock().await;
        tables.detach(connection_id)
    }

    async fn forget_sessions(&self, room_id: &RoomId, session_ids: &[SessionId]) {
        let mut tables = self.tables.lock().await;
        let mut forgotten = 0;
        for session_id in session_ids {
            let bound_here = tables
                .sessions
                .get(session_id)
                .and_then(|entry| entry.binding.as_ref())
                .is_some_and(|binding| &binding.room_id == room_id);
            if !bound_here {
                continue;
            }
            if let Some(entry) = tables.sessions.remove(session_id)
                && let Some(connection) = entry.connection
            {
                tables.connections.remove(&connection);
            }
            forgotten += 1;
        }
        tracing::debug!(
            "Forgot {} session(s) bound to room '{}'",
            forgotten,
            room_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerSlot;

    fn binding(room: &str, slot: PlayerSlot) -> SessionBinding {
        SessionBinding {
            room_id: RoomId::try_from(room.to_string()).unwrap(),
            slot,
        }
    }

    #[tokio::test]
    async fn test_issue_maps_connection_to_new_session() {
        // テスト項目: 接続ごとに異なるセッションが払い出される
        // given (前提条件):
        let repo = InMemorySessionRepository::new();

        // when (操作):
        let first = repo.issue(ConnectionId::new(1)).await;
        let second = repo.issue(ConnectionId::new(2)).await;

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(repo.session_of(&ConnectionId::new(1)).await, Some(first));
        assert_eq!(repo.count_sessions().await, 2);
    }

    #[tokio::test]
    async fn test_release_unbound_session_forgets_it() {
        // テスト項目: 席のないセッションは切断時に破棄され、席のあるものは残る
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        let idle = repo.issue(ConnectionId::new(1)).await;
        let seated = repo.issue(ConnectionId::new(2)).await;
        repo.bind(&seated, binding("AB12", PlayerSlot::Player1))
            .await;

        // when (操作):
        repo.release_connection(&ConnectionId::new(1)).await;
        repo.release_connection(&ConnectionId::new(2)).await;

        // then (期待する結果):
        assert_eq!(repo.binding_of(&idle).await, None);
        assert_eq!(
            repo.binding_of(&seated).await,
            Some(binding("AB12", PlayerSlot::Player1))
        );
        assert_eq!(repo.session_of(&ConnectionId::new(2)).await, None);
        assert_eq!(repo.count_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_attach_connection_moves_session_to_new_connection() {
        // テスト項目: 再接続した接続が旧セッションを引き継ぎ、仮セッションは破棄される
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        let old = repo.issue(ConnectionId::new(1)).await;
        repo.bind(&old, binding("AB12", PlayerSlot::Player2))
            .await;
        let fresh = repo.issue(ConnectionId::new(5)).await;

        // when (操作):
        repo.attach_connection(&old, ConnectionId::new(5))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            repo.session_of(&ConnectionId::new(5)).await,
            Some(old.clone())
        );
        assert_eq!(repo.session_of(&ConnectionId::new(1)).await, None);
        assert_eq!(repo.binding_of(&fresh).await, None);
        assert_eq!(repo.count_sessions().await, 1);

        // 同じ接続での再実行は冪等
        repo.attach_connection(&old, ConnectionId::new(5))
            .await
            .unwrap();
        assert_eq!(repo.session_of(&ConnectionId::new(5)).await, Some(old));
    }

    #[tokio::test]
    async fn test_attach_unknown_session() {
        let repo = InMemorySessionRepository::new();
        let result = repo
            .attach_connection(&SessionId::generate(), ConnectionId::new(1))
            .await;
        assert!(matches!(result, Err(RepositoryError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_forget_sessions_drops_only_seats_of_room() {
        // テスト項目: 指定したセッションのうち、そのルームの席に紐付いたものだけが削除される
        // given (前提条件):
        let repo = InMemorySessionRepository::new();
        let a = repo.issue(ConnectionId::new(1)).await;
        let b = repo.issue(ConnectionId::new(2)).await;
        let c = repo.issue(ConnectionId::new(3)).await;
        let d = repo.issue(ConnectionId::new(4)).await;
        repo.bind(&a, binding("AB12", PlayerSlot::Player1)).await;
        repo.bind(&b, binding("AB12", PlayerSlot::Player2)).await;
        repo.bind(&c, binding("CD34", PlayerSlot::Player1)).await;
        // 同じコードで作り直されたルームの席（削除対象に含めない）
        repo.bind(&d, binding("AB12", PlayerSlot::Player1)).await;

        // when (操作):
        repo.forget_sessions(
            &RoomId::try_from("AB12".to_string()).unwrap(),
            &[a.clone(), b.clone(), c.clone()],
        )
        .await;

        // then (期待する結果):
        assert_eq!(repo.binding_of(&a).await, None);
        assert_eq!(repo.binding_of(&b).await, None);
        assert!(repo.binding_of(&c).await.is_some());
        assert_eq!(
            repo.binding_of(&d).await,
            Some(binding("AB12", PlayerSlot::Player1))
        );
        assert_eq!(repo.session_of(&ConnectionId::new(1)).await, None);
        assert_eq!(repo.session_of(&ConnectionId::new(4)).await, Some(d));
        assert_eq!(repo.count_sessions().await, 2);
    }
}
