//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{ConnectionBinding, Participant, RoomSnapshot},
    error::RepositoryError,
    value_object::{ConnectionId, RoomId, UserId},
};

/// 参加者追加の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    /// 追加後の Room
    pub snapshot: RoomSnapshot,
    /// 同じ userId を保持していた以前の接続（紐付けは既に破棄済み）
    pub superseded: Option<ConnectionId>,
}

/// 参加者削除の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRemoval {
    pub participant: Participant,
    /// 削除された参加者が画面共有者だったか（共有者は同時にクリア済み）
    pub was_screen_sharer: bool,
    /// 削除により Room が空になり、Registry から削除されたか
    pub room_emptied: bool,
    /// 削除後の Room（空の場合は参加者なし）
    pub remaining: RoomSnapshot,
}

/// 画面共有者設定の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenShareChange {
    /// 置き換えられた以前の共有者
    pub previous: Option<UserId>,
    pub snapshot: RoomSnapshot,
}

/// Registry 全体の統計（ヘルスチェック用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub rooms: usize,
    pub participants: usize,
}

/// Room Registry trait
///
/// Room と参加者のライフサイクルを所有する。同じ Room に対する更新は直列化され、
/// 異なる Room に対する操作は互いをブロックしない。
/// 参加者の追加・削除に合わせて `ConnectionDirectory` も更新する。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 参加者を追加（必要なら Room を作成）し、接続を紐付ける
    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<JoinedRoom, RepositoryError>;

    /// 参加者を削除する。Room が空になった場合は Room も削除する
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<ParticipantRemoval>;

    /// 参加者が指定した接続で表されている場合のみ削除する
    async fn remove_participant_if_connection(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        connection_id: &ConnectionId,
    ) -> Option<ParticipantRemoval>;

    /// 参加者が 0 人の Room を削除し、削除したかを返す
    async fn delete_if_empty(&self, room_id: &RoomId) -> bool;

    /// 画面共有者を設定する（参加者でない場合は失敗）
    async fn set_screen_sharer(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<ScreenShareChange, RepositoryError>;

    /// 現在の画面共有者が `user_id` の場合のみクリアし、クリア後の Room を返す
    async fn clear_screen_sharer_if_matches(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Option<RoomSnapshot>;

    /// 参加者の現在の接続を取得
    async fn find_connection_for(&self, room_id: &RoomId, user_id: &UserId)
    -> Option<ConnectionId>;

    async fn get_room(&self, room_id: &RoomId) -> Option<RoomSnapshot>;

    /// 全ての Room を RoomId 順に取得
    async fn list_rooms(&self) -> Vec<RoomSnapshot>;

    async fn stats(&self) -> RegistryStats;
}

/// Connection Directory trait
///
/// 接続 ID から (Room, 参加者) への逆引き。切断時のクリーンアップに使う。
/// ライフサイクルは所有せず、`RoomRegistry` によって同期される。
#[async_trait]
pub trait ConnectionDirectory: Send + Sync {
    /// 接続を紐付け、以前の紐付けがあれば返す
    async fn bind(
        &self,
        connection_id: ConnectionId,
        binding: ConnectionBinding,
    ) -> Option<ConnectionBinding>;

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<ConnectionBinding>;

    /// 紐付けを削除し、削除した紐付けを返す
    async fn unbind(&self, connection_id: &ConnectionId) -> Option<ConnectionBinding>;

    /// 紐付けが `binding` と一致する場合のみ削除する
    async fn unbind_if_matches(
        &self,
        connection_id: &ConnectionId,
        binding: &ConnectionBinding,
    ) -> bool;

    async fn count(&self) -> usize;
}
