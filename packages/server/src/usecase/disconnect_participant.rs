//! UseCase: 接続切断時のクリーンアップ
//!
//! 接続ごとに 1 回だけ呼ばれる想定ですが、複数回呼ばれても安全です（冪等）。

use std::sync::Arc;

use crate::domain::{
    ConnectionDirectory, ConnectionId, Delivery, MessagePusher, RoomRegistry, deliver_all,
};

use super::departure::departure_deliveries;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn RoomRegistry>,
    directory: Arc<dyn ConnectionDirectory>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        directory: Arc<dyn ConnectionDirectory>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            directory,
            message_pusher,
        }
    }

    /// 切断を実行し、残りの参加者に送信した通知を返す
    ///
    /// 紐付けのない接続（未参加・退出済み・別の接続に移行済み）は何もしない。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Delivery> {
        // 1. 以後この接続には送信しない
        self.message_pusher.unregister_client(connection_id).await;

        // 2. 紐付けを外す
        let Some(binding) = self.directory.unbind(connection_id).await else {
            tracing::debug!("Connection '{}' was not in any room", connection_id);
            return Vec::new();
        };

        // 3. この接続が参加者を表している場合のみ削除
        let Some(removal) = self
            .registry
            .remove_participant_if_connection(&binding.room_id, &binding.user_id, connection_id)
            .await
        else {
            return Vec::new();
        };
        tracing::info!(
            "User {} disconnected from room {}",
            binding.user_id,
            binding.room_id
        );

        // 4. 残りの参加者に通知
        let deliveries = departure_deliveries(&removal);
        deliver_all(self.message_pusher.as_ref(), &deliveries).await;
        deliveries
    }
}
