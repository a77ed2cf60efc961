//! InMemory Connection Directory 実装
//!
//! 接続 ID → (Room, 参加者) の逆引きを HashMap で保持します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionBinding, ConnectionDirectory, ConnectionId};

/// インメモリ Connection Directory 実装
#[derive(Default)]
pub struct InMemoryConnectionDirectory {
    bindings: Mutex<HashMap<ConnectionId, ConnectionBinding>>,
}

impl InMemoryConnectionDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionDirectory for InMemoryConnectionDirectory {
    async fn bind(
        &self,
        connection_id: ConnectionId,
        binding: ConnectionBinding,
    ) -> Option<ConnectionBinding> {
        let mut bindings = self.bindings.lock().await;
        tracing::debug!(
            "Connection '{}' bound to room '{}' as '{}'",
            connection_id,
            binding.room_id,
            binding.user_id
        );
        bindings.insert(connection_id, binding)
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<ConnectionBinding> {
        let bindings = self.bindings.lock().await;
        bindings.get(connection_id).cloned()
    }

    async fn unbind(&self, connection_id: &ConnectionId) -> Option<ConnectionBinding> {
        let mut bindings = self.bindings.lock().await;
        bindings.remove(connection_id)
    }

    async fn unbind_if_matches(
        &self,
        connection_id: &ConnectionId,
        binding: &ConnectionBinding,
    ) -> bool {
        let mut bindings = self.bindings.lock().await;
        if bindings.get(connection_id) == Some(binding) {
            bindings.remove(connection_id);
            true
        } else {
            false
        }
    }

    async fn count(&self) -> usize {
        self.bindings.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, UserId};

    fn binding(room: &str, user: &str) -> ConnectionBinding {
        ConnectionBinding::new(
            RoomId::new(room.to_string()).unwrap(),
            UserId::new(user.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_bind_and_lookup() {
        // テスト項目: 紐付けた接続を逆引きできる
        // given (前提条件):
        let directory = InMemoryConnectionDirectory::new();
        let connection_id = ConnectionId::new("c1");

        // when (操作):
        let previous = directory
            .bind(connection_id.clone(), binding("r", "u1"))
            .await;

        // then (期待する結果):
        assert!(previous.is_none());
        assert_eq!(
            directory.lookup(&connection_id).await,
            Some(binding("r", "u1"))
        );
        assert_eq!(directory.count().await, 1);
    }

    #[tokio::test]
    async fn test_rebind_returns_previous_binding() {
        // テスト項目: 同じ接続を紐付け直すと以前の紐付けが返され、1 つだけ残る
        // given (前提条件):
        let directory = InMemoryConnectionDirectory::new();
        let connection_id = ConnectionId::new("c1");
        directory
            .bind(connection_id.clone(), binding("r1", "u1"))
            .await;

        // when (操作):
        let previous = directory
            .bind(connection_id.clone(), binding("r2", "u1"))
            .await;

        // then (期待する結果):
        assert_eq!(previous, Some(binding("r1", "u1")));
        assert_eq!(directory.count().await, 1);
    }

    #[tokio::test]
    async fn test_unbind_unknown_connection_is_noop() {
        // テスト項目: 紐付けのない接続の削除は何もしない
        // given (前提条件):
        let directory = InMemoryConnectionDirectory::new();

        // when (操作):
        let removed = directory.unbind(&ConnectionId::new("ghost")).await;

        // then (期待する結果):
        assert!(removed.is_none());
        assert_eq!(directory.count().await, 0);
    }

    #[tokio::test]
    async fn test_unbind_if_matches_ignores_different_binding() {
        // テスト項目: 紐付けが一致しない場合は削除しない
        // given (前提条件):
        let directory = InMemoryConnectionDirectory::new();
        let connection_id = ConnectionId::new("c1");
        directory
            .bind(connection_id.clone(), binding("r", "u1"))
            .await;

        // when (操作):
        let mismatched = directory
            .unbind_if_matches(&connection_id, &binding("r", "u2"))
            .await;
        let matched = directory
            .unbind_if_matches(&connection_id, &binding("r", "u1"))
            .await;

        // then (期待する結果):
        assert!(!mismatched);
        assert!(matched);
        assert!(directory.lookup(&connection_id).await.is_none());
    }
}
