//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する `RoomRegistry` trait の具体的な実装。
//!
//! ## ロックの粒度
//!
//! Room ごとに `Mutex` を持ち、同じ Room への更新だけを直列化します。
//! Room のマップ自体は `RwLock` で保護し、検索・追加・削除の間だけ保持します。
//!
//! ```text
//! rooms: RwLock<HashMap<RoomId, Arc<Mutex<RoomSlot>>>>
//!                                      └─ Room + closed フラグ
//! ```
//!
//! ロックの取得順は常に「Room → マップ」「Room → ConnectionDirectory」です。
//! マップのロックを保持したまま Room のロックを待つことはありません。
//!
//! 空になった Room は `closed` にしてからマップから外します。削除と競合した参加処理は
//! `closed` の Room を見つけた時点でやり直し、新しい Room に参加します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tsunagi_shared::time::{Clock, SystemClock};

use crate::domain::{
    ConnectionBinding, ConnectionDirectory, ConnectionId, DuplicateJoinPolicy,
    DuplicateJoinResolution, JoinedRoom, Participant, ParticipantRemoval, RegistryStats,
    RepositoryError, Room, RoomId, RoomRegistry, RoomSnapshot, ScreenShareChange, Timestamp,
    UserId, resolve_duplicate_join,
};

struct RoomSlot {
    room: Room,
    /// Registry から削除済み
    closed: bool,
}

type SharedSlot = Arc<Mutex<RoomSlot>>;

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    rooms: RwLock<HashMap<RoomId, SharedSlot>>,
    directory: Arc<dyn ConnectionDirectory>,
    policy: DuplicateJoinPolicy,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new(directory: Arc<dyn ConnectionDirectory>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            directory,
            policy: DuplicateJoinPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_policy(mut self, policy: DuplicateJoinPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Room を取得し、存在しなければ空の Room を作成する（冪等）
    ///
    /// 作成直後の空の Room は参加処理のロック内でしか見えない。
    async fn create_or_get_room(&self, room_id: &RoomId) -> SharedSlot {
        if let Some(slot) = self.existing_slot(room_id).await {
            return slot;
        }

        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Created new room: {}", room_id);
                let room = Room::new(room_id.clone(), Timestamp::new(self.clock.now_millis()));
                Arc::new(Mutex::new(RoomSlot {
                    room,
                    closed: false,
                }))
            })
            .clone()
    }

    async fn existing_slot(&self, room_id: &RoomId) -> Option<SharedSlot> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    async fn all_slots(&self) -> Vec<SharedSlot> {
        let rooms = self.rooms.read().await;
        rooms.values().cloned().collect()
    }

    /// Room が空なら closed にしてマップから外す。呼び出し元は Room のロックを保持していること
    async fn close_if_empty(&self, room_id: &RoomId, slot: &SharedSlot, state: &mut RoomSlot) -> bool {
        if state.closed || !state.room.is_empty() {
            return false;
        }
        state.closed = true;

        let mut rooms = self.rooms.write().await;
        if rooms
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            rooms.remove(room_id);
        }
        tracing::info!("Room {} is empty and has been deleted", room_id);
        true
    }

    async fn remove_matching(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        owner: Option<&ConnectionId>,
    ) -> Option<ParticipantRemoval> {
        let slot = self.existing_slot(room_id).await?;
        let mut state = slot.lock().await;
        if state.closed {
            return None;
        }

        if let Some(owner) = owner {
            let current = &state.room.participant(user_id)?.connection_id;
            if current != owner {
                tracing::debug!(
                    "Participant '{}' in room '{}' now belongs to connection '{}', skipping removal for '{}'",
                    user_id,
                    room_id,
                    current,
                    owner
                );
                return None;
            }
        }

        let (participant, was_screen_sharer) = state.room.remove_participant(user_id)?;
        let binding = ConnectionBinding::new(room_id.clone(), user_id.clone());
        self.directory
            .unbind_if_matches(&participant.connection_id, &binding)
            .await;

        let room_emptied = self.close_if_empty(room_id, &slot, &mut state).await;
        tracing::info!(
            "Removed '{}' from room {} ({} remaining)",
            user_id,
            room_id,
            state.room.participant_count()
        );

        Some(ParticipantRemoval {
            participant,
            was_screen_sharer,
            room_emptied,
            remaining: state.room.snapshot(),
        })
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<JoinedRoom, RepositoryError> {
        loop {
            let slot = self.create_or_get_room(room_id).await;
            let mut state = slot.lock().await;
            if state.closed {
                // 削除と競合した。新しい Room で再試行する
                continue;
            }

            let resolution = resolve_duplicate_join(
                self.policy,
                state.room.participant(&participant.user_id),
                &participant.connection_id,
            );
            let binding = ConnectionBinding::new(room_id.clone(), participant.user_id.clone());
            let superseded = match resolution {
                DuplicateJoinResolution::Fresh => None,
                DuplicateJoinResolution::Supersede(previous) => {
                    self.directory.unbind_if_matches(&previous, &binding).await;
                    tracing::info!(
                        "Participant '{}' in room {} migrated from connection '{}' to '{}'",
                        participant.user_id,
                        room_id,
                        previous,
                        participant.connection_id
                    );
                    Some(previous)
                }
                DuplicateJoinResolution::Reject => {
                    return Err(RepositoryError::DuplicateParticipant {
                        room: room_id.to_string(),
                        user: participant.user_id.to_string(),
                    });
                }
            };

            let connection_id = participant.connection_id.clone();
            state.room.upsert_participant(participant);
            self.directory.bind(connection_id, binding).await;

            tracing::info!(
                "Room {} now has {} users",
                room_id,
                state.room.participant_count()
            );

            return Ok(JoinedRoom {
                snapshot: state.room.snapshot(),
                superseded,
            });
        }
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<ParticipantRemoval> {
        self.remove_matching(room_id, user_id, None).await
    }

    async fn remove_participant_if_connection(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> Option<ParticipantRemoval> {
        self.remove_matching(room_id, user_id, Some(connection_id))
            .await
    }

    async fn delete_if_empty(&self, room_id: &RoomId) -> bool {
        let Some(slot) = self.existing_slot(room_id).await else {
            return false;
        };
        let mut state = slot.lock().await;
        self.close_if_empty(room_id, &slot, &mut state).await
    }

    async fn set_screen_sharer(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<ScreenShareChange, RepositoryError> {
        let room_not_found = || RepositoryError::RoomNotFound(room_id.to_string());

        let slot = self.existing_slot(room_id).await.ok_or_else(room_not_found)?;
        let mut state = slot.lock().await;
        if state.closed {
            return Err(room_not_found());
        }

        let previous = state.room.set_screen_sharer(user_id).map_err(|_| {
            RepositoryError::ParticipantNotFound {
                room: room_id.to_string(),
                user: user_id.to_string(),
            }
        })?;

        Ok(ScreenShareChange {
            previous,
            snapshot: state.room.snapshot(),
        })
    }

    async fn clear_screen_sharer_if_matches(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<RoomSnapshot> {
        let slot = self.existing_slot(room_id).await?;
        let mut state = slot.lock().await;
        if state.closed || !state.room.clear_screen_sharer_if_matches(user_id) {
            return None;
        }
        Some(state.room.snapshot())
    }

    async fn find_connection_for(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<ConnectionId> {
        let slot = self.existing_slot(room_id).await?;
        let state = slot.lock().await;
        if state.closed {
            return None;
        }
        state
            .room
            .participant(user_id)
            .map(|p| p.connection_id.clone())
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        let slot = self.existing_slot(room_id).await?;
        let state = slot.lock().await;
        (!state.closed && !state.room.is_empty()).then(|| state.room.snapshot())
    }

    async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let mut snapshots = Vec::new();
        for slot in self.all_slots().await {
            let state = slot.lock().await;
            if !state.closed && !state.room.is_empty() {
                snapshots.push(state.room.snapshot());
            }
        }
        snapshots.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        snapshots
    }

    async fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for slot in self.all_slots().await {
            let state = slot.lock().await;
            if !state.closed && !state.room.is_empty() {
                stats.rooms += 1;
                stats.participants += state.room.participant_count();
            }
        }
        stats
    }
}
