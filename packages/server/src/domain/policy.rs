//! 同じ (room, userId) への重複参加の扱い

use super::{entity::Participant, value_object::ConnectionId};

/// 重複参加ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateJoinPolicy {
    /// 後から参加した接続に識別子を移す（以前の接続の紐付けは破棄）
    #[default]
    Migrate,
    /// 既に別の接続で参加している場合は参加を拒否する
    Reject,
}

/// 重複参加の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateJoinResolution {
    /// 既存の参加者はいない、または同じ接続からの再参加
    Fresh,
    /// 既存の接続を置き換える
    Supersede(ConnectionId),
    /// 参加を拒否する
    Reject,
}

/// 同じ (room, userId) に既存の参加者がいる場合の扱いを決定する
///
/// ポリシーの差し替えはこの関数だけで完結する。
pub fn resolve_duplicate_join(
    policy: DuplicateJoinPolicy,
    existing: Option<&Participant>,
    incoming: &ConnectionId,
) -> DuplicateJoinResolution {
    match existing {
        None => DuplicateJoinResolution::Fresh,
        Some(existing) if &existing.connection_id == incoming => DuplicateJoinResolution::Fresh,
        Some(existing) => match policy {
            DuplicateJoinPolicy::Migrate => {
                DuplicateJoinResolution::Supersede(existing.connection_id.clone())
            }
            DuplicateJoinPolicy::Reject => DuplicateJoinResolution::Reject,
        },
    }
}
