//! UseCase テスト用のヘルパー

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DuplicateJoinPolicy, MessagePusher, RoomId, UserId},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionDirectory, InMemoryRoomRegistry},
    },
};

/// インメモリの Registry / Directory と WebSocket MessagePusher の組
pub(crate) struct Harness {
    pub registry: Arc<InMemoryRoomRegistry>,
    pub directory: Arc<InMemoryConnectionDirectory>,
    pub pusher: Arc<WebSocketMessagePusher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(DuplicateJoinPolicy::Migrate)
    }

    pub fn with_policy(policy: DuplicateJoinPolicy) -> Self {
        let directory = Arc::new(InMemoryConnectionDirectory::new());
        let registry =
            Arc::new(InMemoryRoomRegistry::new(directory.clone()).with_policy(policy));
        Self {
            registry,
            directory,
            pusher: Arc::new(WebSocketMessagePusher::new()),
        }
    }

    /// 接続を登録し、その接続が受け取るメッセージのレシーバーを返す
    pub async fn connect(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::new(id);
        self.pusher.register_client(connection_id.clone(), tx).await;
        (connection_id, rx)
    }
}

/// 届いているメッセージを全て JSON として取り出す
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).expect("pushed message should be JSON"));
    }
    messages
}

pub(crate) fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}
