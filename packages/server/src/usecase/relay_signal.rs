//! UseCase: シグナリングメッセージの中継
//!
//! SDP description / ICE candidate の中身は解釈せず、そのまま宛先に転送します。
//!
//! - `targetUser` があり、Room 内で見つかる → その参加者の接続にだけ送る
//! - `targetUser` が見つからない（UserId として不正な値を含む）、または未指定
//!   → 送信元以外の Room 全体に送る

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Delivery, MessagePusher, Notification, RoomId, RoomRegistry, SignalEnvelope,
    SignalPayload, UserId, deliver_all,
};

use super::{error::RelaySignalError, input::required};

/// 検証済みのシグナリングメッセージ
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySignalInput {
    pub room_id: RoomId,
    /// 宛先の userId（検証しない。解決できなければブロードキャストになる）
    pub target_user: Option<String>,
    pub from_user: Option<String>,
    pub payload: SignalPayload,
}

impl RelaySignalInput {
    pub fn parse(
        room: Option<String>,
        target_user: Option<String>,
        from_user: Option<String>,
        payload: SignalPayload,
    ) -> Result<Self, RelaySignalError> {
        Ok(Self {
            room_id: required(room, "room")?,
            target_user: target_user.filter(|target| !target.is_empty()),
            from_user: from_user.filter(|from| !from.is_empty()),
            payload,
        })
    }
}

/// 中継先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalRoute {
    /// 宛先の参加者の接続
    Direct(ConnectionId),
    /// 送信元以外の Room 内の全ての接続
    Broadcast(Vec<ConnectionId>),
}

impl SignalRoute {
    fn targets(self) -> Vec<ConnectionId> {
        match self {
            Self::Direct(connection_id) => vec![connection_id],
            Self::Broadcast(connection_ids) => connection_ids,
        }
    }
}

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 中継を実行し、選ばれた中継先を返す
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        input: RelaySignalInput,
    ) -> Result<SignalRoute, RelaySignalError> {
        let route = self
            .route(sender, &input.room_id, input.target_user.as_deref())
            .await;

        let envelope = SignalEnvelope {
            room_id: input.room_id,
            from_user: input
                .from_user
                .unwrap_or_else(|| sender.as_str().to_string()),
            target_user: input.target_user,
            payload: input.payload,
        };
        let delivery = Delivery::new(route.clone().targets(), Notification::Signal(envelope));
        deliver_all(self.message_pusher.as_ref(), std::slice::from_ref(&delivery)).await;

        Ok(route)
    }

    async fn route(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        target_user: Option<&str>,
    ) -> SignalRoute {
        if let Some(target_user) = target_user {
            if let Some(connection_id) = self.resolve_target(room_id, target_user).await {
                tracing::debug!("Relaying signal in room {} to '{}'", room_id, target_user);
                return SignalRoute::Direct(connection_id);
            }
            tracing::debug!(
                "Signal target '{}' not found in room {}, broadcasting instead",
                target_user,
                room_id
            );
        }

        let targets = self
            .registry
            .get_room(room_id)
            .await
            .map(|snapshot| snapshot.connection_ids_except(sender))
            .unwrap_or_default();
        SignalRoute::Broadcast(targets)
    }

    /// 宛先の接続を探す。UserId として不正な値は Room にいないものとして扱う
    async fn resolve_target(&self, room_id: &RoomId, target_user: &str) -> Option<ConnectionId> {
        let user_id = UserId::new(target_user.to_string()).ok()?;
        self.registry.find_connection_for(room_id, &user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, Participant, Timestamp};
    use crate::usecase::test_support::{Harness, drain, room, user};
    use serde_json::json;

    async fn join(harness: &Harness, user_id: &str, connection_id: &ConnectionId) {
        let user_id = user(user_id);
        harness
            .registry
            .add_participant(
                &room("r"),
                Participant::new(
                    user_id.clone(),
                    DisplayName::default_for(&user_id),
                    connection_id.clone(),
                    Timestamp::new(0),
                ),
            )
            .await
            .unwrap();
    }

    fn offer() -> SignalPayload {
        SignalPayload {
            description: Some(json!({"type": "offer", "sdp": "v=0"})),
            candidate: None,
        }
    }

    fn input(target_user: Option<&str>, from_user: Option<&str>) -> RelaySignalInput {
        RelaySignalInput::parse(
            Some("r".to_string()),
            target_user.map(str::to_string),
            from_user.map(str::to_string),
            offer(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_signal_to_present_target_is_delivered_only_to_target() {
        // テスト項目: 宛先が Room にいる場合、宛先にだけ届く
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        let (c3, mut rx3) = harness.connect("c3").await;
        join(&harness, "u1", &c1).await;
        join(&harness, "u2", &c2).await;
        join(&harness, "u3", &c3).await;
        let usecase = RelaySignalUseCase::new(harness.registry.clone(), harness.pusher.clone());

        // when (操作):
        let route = usecase.execute(&c2, input(Some("u1"), Some("u2"))).await.unwrap();

        // then (期待する結果):
        assert_eq!(route, SignalRoute::Direct(c1));
        assert_eq!(
            drain(&mut rx1),
            vec![json!({
                "type": "signal",
                "room": "r",
                "fromUser": "u2",
                "targetUser": "u1",
                "description": {"type": "offer", "sdp": "v=0"}
            })]
        );
        assert!(drain(&mut rx2).is_empty());
        assert!(drain(&mut rx3).is_empty());
    }

    #[tokio::test]
    async fn test_signal_to_missing_target_falls_back_to_broadcast() {
        // テスト項目: 宛先が見つからない場合、送信元以外の全員に届く
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        let (c3, mut rx3) = harness.connect("c3").await;
        join(&harness, "u1", &c1).await;
        join(&harness, "u2", &c2).await;
        join(&harness, "u3", &c3).await;
        let usecase = RelaySignalUseCase::new(harness.registry.clone(), harness.pusher.clone());

        // when (操作):
        let route = usecase
            .execute(&c2, input(Some("ghost"), Some("u2")))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(route, SignalRoute::Broadcast(vec![c1, c3]));
        assert_eq!(drain(&mut rx1)[0]["targetUser"], "ghost");
        assert!(drain(&mut rx2).is_empty());
        assert_eq!(drain(&mut rx3).len(), 1);
    }

    #[tokio::test]
    async fn test_signal_to_invalid_target_falls_back_to_broadcast() {
        // テスト項目: UserId として不正な宛先（長すぎる）は見つからない宛先として扱われ、送信元以外に届く
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, mut rx2) = harness.connect("c2").await;
        join(&harness, "u1", &c1).await;
        join(&harness, "u2", &c2).await;
        let usecase = RelaySignalUseCase::new(harness.registry.clone(), harness.pusher.clone());
        let too_long = "x".repeat(200);

        // when (操作):
        let route = usecase
            .execute(&c2, input(Some(&too_long), Some("u2")))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(route, SignalRoute::Broadcast(vec![c1]));
        let received = drain(&mut rx1);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["targetUser"], too_long.as_str());
        assert!(drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn test_signal_without_target_broadcasts_and_defaults_from_user() {
        // テスト項目: 宛先・送信者が未指定の場合、送信元以外に届き fromUser は接続 ID になる
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, _rx2) = harness.connect("c2").await;
        join(&harness, "u1", &c1).await;
        join(&harness, "u2", &c2).await;
        let usecase = RelaySignalUseCase::new(harness.registry.clone(), harness.pusher.clone());

        // when (操作):
        let route = usecase.execute(&c2, input(Some(""), None)).await.unwrap();

        // then (期待する結果):
        assert_eq!(route, SignalRoute::Broadcast(vec![c1]));
        let received = drain(&mut rx1);
        assert_eq!(received[0]["fromUser"], "c2");
        assert_eq!(received[0]["targetUser"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_explicit_null_candidate_is_forwarded() {
        // テスト項目: 明示的に null の candidate はそのまま転送される
        // given (前提条件):
        let harness = Harness::new();
        let (c1, mut rx1) = harness.connect("c1").await;
        let (c2, _rx2) = harness.connect("c2").await;
        join(&harness, "u1", &c1).await;
        join(&harness, "u2", &c2).await;
        let usecase = RelaySignalUseCase::new(harness.registry.clone(), harness.pusher.clone());
        let input = RelaySignalInput::parse(
            Some("r".to_string()),
            Some("u1".to_string()),
            Some("u2".to_string()),
            SignalPayload {
                description: None,
                candidate: Some(serde_json::Value::Null),
            },
        )
        .unwrap();

        // when (操作):
        usecase.execute(&c2, input).await.unwrap();

        // then (期待する結果):
        let received = drain(&mut rx1);
        let object = received[0].as_object().unwrap();
        assert!(object.contains_key("candidate"));
        assert!(object["candidate"].is_null());
        assert!(!object.contains_key("description"));
    }

    #[tokio::test]
    async fn test_signal_to_unknown_room_reaches_nobody() {
        // テスト項目: 存在しない Room へのシグナリングは誰にも届かない
        // given (前提条件):
        let harness = Harness::new();
        let (c1, _rx1) = harness.connect("c1").await;
        let usecase = RelaySignalUseCase::new(harness.registry.clone(), harness.pusher.clone());

        // when (操作):
        let route = usecase.execute(&c1, input(None, None)).await.unwrap();

        // then (期待する結果):
        assert_eq!(route, SignalRoute::Broadcast(vec![]));
    }
}
