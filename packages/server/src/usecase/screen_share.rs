//! UseCase: 画面共有の開始・停止
//!
//! Room ごとに画面共有者は最大 1 人です。開始は後勝ちで、以前の共有者を上書きします。

use std::sync::Arc;

use crate::domain::{
    Delivery, DisplayName, MessagePusher, Notification, RoomId, RoomRegistry, UserId, deliver_all,
};

use super::{
    error::ScreenShareError,
    input::{optional, required},
};

/// 検証済みの画面共有開始リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartScreenShareInput {
    pub room_id: RoomId,
    pub user_id: UserId,
    /// 未指定の場合は参加時の表示名
    pub display_name: Option<DisplayName>,
}

impl StartScreenShareInput {
    pub fn parse(
        room: Option<String>,
        user_id: Option<String>,
        username: Option<String>,
    ) -> Result<Self, ScreenShareError> {
        Ok(Self {
            room_id: required(room, "room")?,
            user_id: required(user_id, "userId")?,
            display_name: optional(username)?,
        })
    }
}

/// 検証済みの画面共有停止リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopScreenShareInput {
    pub room_id: RoomId,
    pub user_id: UserId,
}

impl StopScreenShareInput {
    pub fn parse(room: Option<String>, user_id: Option<String>) -> Result<Self, ScreenShareError> {
        Ok(Self {
            room_id: required(room, "room")?,
            user_id: required(user_id, "userId")?,
        })
    }
}

/// 画面共有開始のユースケース
pub struct StartScreenShareUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 上書きされた共有者の screen-share-stopped を送るか
    announce_replaced_sharer: bool,
}

impl StartScreenShareUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        announce_replaced_sharer: bool,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            announce_replaced_sharer,
        }
    }

    pub async fn execute(
        &self,
        input: StartScreenShareInput,
    ) -> Result<Vec<Delivery>, ScreenShareError> {
        // 1. 共有者を設定（参加者でなければ失敗）
        let change = self
            .registry
            .set_screen_sharer(&input.room_id, &input.user_id)
            .await
            .map_err(|e| {
                tracing::debug!("Screen share start refused: {}", e);
                ScreenShareError::NotAParticipant
            })?;
        tracing::info!(
            "User {} started screen sharing in room {}",
            input.user_id,
            input.room_id
        );

        // 2. 通知を組み立てる
        let targets = change.snapshot.connection_ids();
        let display_name = match input.display_name {
            Some(display_name) => display_name,
            None => change
                .snapshot
                .participant(&input.user_id)
                .map(|p| p.display_name.clone())
                .unwrap_or_else(|| DisplayName::default_for(&input.user_id)),
        };

        let mut deliveries = Vec::with_capacity(2);
        if self.announce_replaced_sharer {
            if let Some(previous) = change.previous.filter(|previous| previous != &input.user_id) {
                deliveries.push(Delivery::new(
                    targets.clone(),
                    Notification::ScreenShareStopped { user_id: previous },
                ));
            }
        }
        deliveries.push(Delivery::new(
            targets,
            Notification::ScreenShareStarted {
                user_id: input.user_id,
                display_name,
            },
        ));

        // 3. 送信
        deliver_all(self.message_pusher.as_ref(), &deliveries).await;
        Ok(deliveries)
    }
}

/// 画面共有停止のユースケース
pub struct StopScreenShareUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl StopScreenShareUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 現在の共有者による停止だけを受け付ける
    pub async fn execute(
        &self,
        input: StopScreenShareInput,
    ) -> Result<Vec<Delivery>, ScreenShareError> {
        let snapshot = self
            .registry
            .clear_screen_sharer_if_matches(&input.room_id, &input.user_id)
            .await
            .ok_or(ScreenShareError::NotCurrentSharer)?;
        tracing::info!(
            "User {} stopped screen sharing in room {}",
            input.user_id,
            input.room_id
        );

        let deliveries = vec![Delivery::new(
            snapshot.connection_ids(),
            Notification::ScreenShareStopped {
                user_id: input.user_id,
            },
        )];
        deliver_all(self.message_pusher.as_ref(), &deliveries).await;
        Ok(deliveries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Participant, Timestamp};
    use crate::usecase::test_support::{Harness, drain, room, user};

    async fn join(harness: &Harness, user_id: &str, name: &str, connection_id: &ConnectionId) {
        harness
            .registry
            .add_participant(
                &room("r"),
                Participant::new(
                    user(user_id),
                    DisplayName::new(name.to_string()).unwrap(),
                    connection_id.clone(),
                    Timestamp::new(0),
                ),
            )
            .await
            .unwrap();
    }

    fn start_input(user_id: &str, username: Option<&str>) -> StartScreenShareInput {
        StartScreenShareInput::parse(
            Some("r".to_string()),
            Some(user_id.to_string()),
            username.map(str::to_string),
        )
        .unwrap()
    }

    fn stop_input(user_id: &str) -> StopScreenShareInput {
        StopScreenShareInput::parse(Some("r".to_string()), Some(user_id.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_start_notifies_whole_room_with_stored_display_name() {
        // テスト項目: 共有開始は共有者本人を含む Room 全体に届き、username 省略時は参加時の表示名になる
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        join(&harness, "u1", "Alice", &c1).await;
        join(&harness, "u2", "Bob", &c2).await;
        let usecase =
            StartScreenShareUseCase::new(harness.registry.clone(), harness.pusher.clone(), false);

        // when (操作):
        usecase.execute(start_input("u1", None)).await.unwrap();

        // then (期待する結果):
        let expected = serde_json::json!({
            "type": "screen-share-started",
            "userId": "u1",
            "username": "Alice"
        });
        assert_eq!(drain(&mut rx1), vec![expected.clone()]);
        assert_eq!(drain(&mut rx2), vec![expected]);
        let snapshot = harness.registry.get_room(&room("r")).await.unwrap();
        assert_eq!(snapshot.screen_sharer, Some(user("u1")));
    }

    #[tokio::test]
    async fn test_start_by_non_participant_is_refused() {
        // テスト項目: 参加者でないユーザーの共有開始は拒否され、誰にも通知されない
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        join(&harness, "u1", "Alice", &c1).await;
        let usecase =
            StartScreenShareUseCase::new(harness.registry.clone(), harness.pusher.clone(), false);

        // when (操作):
        let result = usecase.execute(start_input("outsider", Some("Eve"))).await;

        // then (期待する結果):
        assert_eq!(result, Err(ScreenShareError::NotAParticipant));
        assert!(drain(&mut rx1).is_empty());
        let snapshot = harness.registry.get_room(&room("r")).await.unwrap();
        assert_eq!(snapshot.screen_sharer, None);
    }

    #[tokio::test]
    async fn test_start_overwrites_sharer_silently_by_default() {
        // テスト項目: 既定では共有者の上書き時に以前の共有者への停止通知は送られない
        // given (前提条件):
        let harness = Harness::new();
        let (c1, _rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        join(&harness, "u1", "Alice", &c1).await;
        join(&harness, "u2", "Bob", &c2).await;
        let usecase =
            StartScreenShareUseCase::new(harness.registry.clone(), harness.pusher.clone(), false);
        usecase.execute(start_input("u1", None)).await.unwrap();
        drain(&mut rx2);

        // when (操作):
        usecase.execute(start_input("u2", None)).await.unwrap();

        // then (期待する結果):
        let received = drain(&mut rx2);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["type"], "screen-share-started");
        assert_eq!(received[0]["userId"], "u2");
        let snapshot = harness.registry.get_room(&room("r")).await.unwrap();
        assert_eq!(snapshot.screen_sharer, Some(user("u2")));
    }

    #[tokio::test]
    async fn test_start_announces_replaced_sharer_when_enabled() {
        // テスト項目: 設定が有効な場合、上書きされた共有者の screen-share-stopped が先に届く
        // given (前提条件):
        let harness = Harness::new();
        let (c1, _rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        join(&harness, "u1", "Alice", &c1).await;
        join(&harness, "u2", "Bob", &c2).await;
        let usecase =
            StartScreenShareUseCase::new(harness.registry.clone(), harness.pusher.clone(), true);
        usecase.execute(start_input("u1", None)).await.unwrap();
        drain(&mut rx2);

        // when (操作):
        usecase.execute(start_input("u2", Some("Bobby"))).await.unwrap();

        // then (期待する結果):
        let received = drain(&mut rx2);
        assert_eq!(received.len(), 2);
        assert_eq!(received[0]["type"], "screen-share-stopped");
        assert_eq!(received[0]["userId"], "u1");
        assert_eq!(received[1]["type"], "screen-share-started");
        assert_eq!(received[1]["username"], "Bobby");
    }

    #[tokio::test]
    async fn test_stop_by_current_sharer_notifies_room() {
        // テスト項目: 現在の共有者による停止は Room 全体に届く
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        join(&harness, "u1", "Alice", &c1).await;
        join(&harness, "u2", "Bob", &c2).await;
        harness
            .registry
            .set_screen_sharer(&room("r"), &user("u1"))
            .await
            .unwrap();
        let usecase = StopScreenShareUseCase::new(harness.registry.clone(), harness.pusher.clone());

        // when (操作):
        usecase.execute(stop_input("u1")).await.unwrap();

        // then (期待する結果):
        let expected = serde_json::json!({"type": "screen-share-stopped", "userId": "u1"});
        assert_eq!(drain(&mut rx1), vec![expected.clone()]);
        assert_eq!(drain(&mut rx2), vec![expected]);
    }

    #[tokio::test]
    async fn test_stop_by_other_user_is_ignored() {
        // テスト項目: 共有者以外による停止は無視され、共有者は変わらない
        // given (前提条件):
        let harness = Harness::new();
        let (c1, _rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        join(&harness, "u1", "Alice", &c1).await;
        join(&harness, "u2", "Bob", &c2).await;
        harness
            .registry
            .set_screen_sharer(&room("r"), &user("u1"))
            .await
            .unwrap();
        let usecase = StopScreenShareUseCase::new(harness.registry.clone(), harness.pusher.clone());

        // when (操作):
        let result = usecase.execute(stop_input("u2")).await;

        // then (期待する結果):
        assert_eq!(result, Err(ScreenShareError::NotCurrentSharer));
        assert!(drain(&mut rx2).is_empty());
        let snapshot = harness.registry.get_room(&room("r")).await.unwrap();
        assert_eq!(snapshot.screen_sharer, Some(user("u1")));
    }
}
