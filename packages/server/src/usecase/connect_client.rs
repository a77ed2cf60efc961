//! UseCase: WebSocket 接続の受付

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続受付のユースケース
///
/// 接続 ID を採番し、通知の送信先として登録する。Room への参加は行わない。
pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message_pusher::MockMessagePusher;

    #[tokio::test]
    async fn test_connect_registers_generated_connection() {
        // テスト項目: 採番された接続 ID で MessagePusher に登録される
        // given (前提条件):
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_register_client()
            .times(1)
            .returning(|_, _| ());
        let usecase = ConnectClientUseCase::new(Arc::new(message_pusher));
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let connection_id = usecase.execute(tx).await;

        // then (期待する結果):
        assert!(!connection_id.as_str().is_empty());
    }
}
