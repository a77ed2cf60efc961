//! エンティティ
//!
//! Room と参加者、および接続と参加者の対応（ConnectionBinding）を定義します。
//! Room は自身の不変条件（画面共有者は必ず参加者である）を守る責務を持ちます。

use std::collections::BTreeMap;

use super::value_object::{ConnectionId, DisplayName, RoomId, Timestamp, UserId};

/// Room の参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    pub display_name: DisplayName,
    /// この参加者を現在表しているトランスポート接続
    pub connection_id: ConnectionId,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(
        user_id: UserId,
        display_name: DisplayName,
        connection_id: ConnectionId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            display_name,
            connection_id,
            joined_at,
        }
    }
}

/// 接続がどの Room のどの参加者を表しているか
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionBinding {
    pub room_id: RoomId,
    pub user_id: UserId,
}

impl ConnectionBinding {
    pub fn new(room_id: RoomId, user_id: UserId) -> Self {
        Self { room_id, user_id }
    }
}

/// Room エンティティ
///
/// 参加者は userId をキーに保持する（userId 順に並ぶ）。
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    participants: BTreeMap<UserId, Participant>,
    screen_sharer: Option<UserId>,
    pub created_at: Timestamp,
}

impl Room {
    /// 空の Room を作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: BTreeMap::new(),
            screen_sharer: None,
            created_at,
        }
    }

    /// 参加者を追加（同じ userId があれば上書き）し、上書き前の参加者を返す
    pub fn upsert_participant(&mut self, participant: Participant) -> Option<Participant> {
        self.participants
            .insert(participant.user_id.clone(), participant)
    }

    /// 参加者を削除する
    ///
    /// 削除された参加者が画面共有中だった場合は共有者も同時にクリアし、
    /// `(削除された参加者, 画面共有者だったか)` を返す。
    pub fn remove_participant(&mut self, user_id: &UserId) -> Option<(Participant, bool)> {
        let participant = self.participants.remove(user_id)?;
        let was_screen_sharer = self.screen_sharer.as_ref() == Some(user_id);
        if was_screen_sharer {
            self.screen_sharer = None;
        }
        Some((participant, was_screen_sharer))
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.get(user_id)
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.participants.contains_key(user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn screen_sharer(&self) -> Option<&UserId> {
        self.screen_sharer.as_ref()
    }

    /// 画面共有者を設定し、置き換えられた以前の共有者を返す
    ///
    /// 参加者でない userId は設定できない（`None` ではなく `Err` を返す）。
    pub fn set_screen_sharer(&mut self, user_id: &UserId) -> Result<Option<UserId>, ()> {
        if !self.contains(user_id) {
            return Err(());
        }
        Ok(self.screen_sharer.replace(user_id.clone()))
    }

    /// 現在の画面共有者が `user_id` の場合のみクリアする
    pub fn clear_screen_sharer_if_matches(&mut self, user_id: &UserId) -> bool {
        if self.screen_sharer.as_ref() == Some(user_id) {
            self.screen_sharer = None;
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.id.clone(),
            participants: self.participants.values().cloned().collect(),
            screen_sharer: self.screen_sharer.clone(),
            created_at: self.created_at,
        }
    }
}

/// ロック外に持ち出すための Room の読み取り専用コピー
///
/// 通知の宛先や内容はこのスナップショットから組み立てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    /// userId 順
    pub participants: Vec<Participant>,
    pub screen_sharer: Option<UserId>,
    pub created_at: Timestamp,
}

impl RoomSnapshot {
    pub fn user_ids(&self) -> Vec<UserId> {
        self.participants
            .iter()
            .map(|p| p.user_id.clone())
            .collect()
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.user_id == user_id)
    }

    /// Room 内の全ての接続
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .map(|p| p.connection_id.clone())
            .collect()
    }

    /// 指定した接続以外の全ての接続
    pub fn connection_ids_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .filter(|p| &p.connection_id != exclude)
            .map(|p| p.connection_id.clone())
            .collect()
    }
}
