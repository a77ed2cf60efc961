//! UseCase: Room への参加
//!
//! 接続が別の (Room, 参加者) に紐付いている場合は、参加が成功した後にそちらから退出させる。
//! 参加が拒否された場合、以前の紐付けはそのまま残る。

use std::sync::Arc;

use tsunagi_shared::time::{Clock, SystemClock};

use crate::domain::{
    ConnectionBinding, ConnectionDirectory, ConnectionId, Delivery, DisplayName, MessagePusher,
    Notification, Participant, ParticipantRemoval, RepositoryError, RoomId, RoomRegistry,
    RoomSnapshot, Timestamp, UserId, deliver_all,
};

use super::{
    departure::departure_deliveries,
    error::JoinRoomError,
    input::{optional, required},
};

/// 検証済みの参加リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRoomInput {
    pub room_id: RoomId,
    /// 未指定の場合は参加時に採番する
    pub user_id: Option<UserId>,
    /// 未指定の場合は `User_<userId の先頭 8 文字>`
    pub display_name: Option<DisplayName>,
}

impl JoinRoomInput {
    pub fn parse(
        room: Option<String>,
        user_id: Option<String>,
        username: Option<String>,
    ) -> Result<Self, JoinRoomError> {
        Ok(Self {
            room_id: required(room, "room")?,
            user_id: optional(user_id)?,
            display_name: optional(username)?,
        })
    }
}

/// 参加の結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub user_id: UserId,
    pub snapshot: RoomSnapshot,
    /// 送信済みの通知（以前の Room からの退出分を含む）
    pub deliveries: Vec<Delivery>,
}

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    directory: Arc<dyn ConnectionDirectory>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        directory: Arc<dyn ConnectionDirectory>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            directory,
            message_pusher,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        input: JoinRoomInput,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let user_id = input.user_id.unwrap_or_else(UserId::generate);
        let display_name = input
            .display_name
            .unwrap_or_else(|| DisplayName::default_for(&user_id));

        // 1. 接続の現在の紐付けを確認する（退出は参加が確定してから）
        let target = ConnectionBinding::new(input.room_id.clone(), user_id.clone());
        let previous = self
            .directory
            .lookup(connection_id)
            .await
            .filter(|previous| previous != &target);

        // 2. 参加者を追加。拒否された場合は以前の Room を含め何も変わらない
        let participant = Participant::new(
            user_id.clone(),
            display_name.clone(),
            connection_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let joined = self
            .registry
            .add_participant(&input.room_id, participant)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "Join of '{}' to room {} refused: {}",
                    user_id,
                    input.room_id,
                    e
                );
                match e {
                    RepositoryError::DuplicateParticipant { user, .. } => {
                        JoinRoomError::DuplicateParticipant(user)
                    }
                    other => JoinRoomError::Registry(other),
                }
            })?;
        tracing::info!(
            "User {} ({}) joined room {}",
            user_id,
            display_name.as_str(),
            input.room_id
        );

        // 3. 以前の (Room, 参加者) から退出させる
        let mut snapshot = joined.snapshot;
        let mut deliveries = Vec::new();
        if let Some(previous) = previous {
            if let Some(removal) = self.leave_previous(connection_id, &previous).await {
                // 同じ Room で別の userId に切り替えた場合は退出後の Room を通知に使う
                if removal.remaining.room_id == snapshot.room_id {
                    snapshot = removal.remaining.clone();
                }
                deliveries = departure_deliveries(&removal);
            }
        }

        // 4. Room 全体に user-joined、参加者本人に room-users
        deliveries.push(Delivery::new(
            snapshot.connection_ids(),
            Notification::UserJoined {
                user_id: user_id.clone(),
                display_name,
                room_users: snapshot.user_ids(),
                screen_sharer: snapshot.screen_sharer.clone(),
            },
        ));
        deliveries.push(Delivery::to_one(
            connection_id.clone(),
            Notification::RoomUsers {
                participants: snapshot.participants.clone(),
                screen_sharer: snapshot.screen_sharer.clone(),
            },
        ));

        // 5. ロック解放後に送信
        deliver_all(self.message_pusher.as_ref(), &deliveries).await;

        Ok(JoinOutcome {
            user_id,
            snapshot,
            deliveries,
        })
    }

    /// 参加者がまだこの接続で表されている場合のみ削除する
    ///
    /// 接続の紐付けは参加時に新しい (Room, 参加者) へ置き換え済み。
    async fn leave_previous(
        &self,
        connection_id: &ConnectionId,
        previous: &ConnectionBinding,
    ) -> Option<ParticipantRemoval> {
        tracing::info!(
            "Connection '{}' leaves room {} as '{}'",
            connection_id,
            previous.room_id,
            previous.user_id
        );
        self.registry
            .remove_participant_if_connection(&previous.room_id, &previous.user_id, connection_id)
            .await
    }
}
