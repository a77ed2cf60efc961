//! UseCase: Room からの明示的な退出

use std::sync::Arc;

use crate::domain::{Delivery, MessagePusher, RoomId, RoomRegistry, UserId, deliver_all};

use super::{departure::departure_deliveries, error::LeaveRoomError, input::required};

/// 検証済みの退出リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRoomInput {
    pub room_id: RoomId,
    pub user_id: UserId,
}

impl LeaveRoomInput {
    pub fn parse(room: Option<String>, user_id: Option<String>) -> Result<Self, LeaveRoomError> {
        Ok(Self {
            room_id: required(room, "room")?,
            user_id: required(user_id, "userId")?,
        })
    }
}

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 退出を実行し、送信した通知を返す
    ///
    /// 参加していないユーザーの場合は `NotInRoom`（状態は変わらない）。
    pub async fn execute(&self, input: LeaveRoomInput) -> Result<Vec<Delivery>, LeaveRoomError> {
        let removal = self
            .registry
            .remove_participant(&input.room_id, &input.user_id)
            .await
            .ok_or(LeaveRoomError::NotInRoom)?;
        tracing::info!("User {} left room {}", input.user_id, input.room_id);

        let deliveries = departure_deliveries(&removal);
        deliver_all(self.message_pusher.as_ref(), &deliveries).await;
        Ok(deliveries)
    }
}
