//! 参加者が Room から外れたときの通知
//!
//! 明示的な退出・切断・別の Room への移動で共通に使います。

use crate::domain::{Delivery, Notification, ParticipantRemoval};

/// 残りの参加者への通知を組み立てる
///
/// 画面共有者だった場合は `screen-share-stopped` を先に、続けて `user-left` を送る。
/// 誰も残っていない場合は何も送らない。
pub fn departure_deliveries(removal: &ParticipantRemoval) -> Vec<Delivery> {
    let targets = removal.remaining.connection_ids();
    if targets.is_empty() {
        return Vec::new();
    }

    let user_id = removal.participant.user_id.clone();
    let mut deliveries = Vec::with_capacity(2);
    if removal.was_screen_sharer {
        deliveries.push(Delivery::new(
            targets.clone(),
            Notification::ScreenShareStopped {
                user_id: user_id.clone(),
            },
        ));
    }
    deliveries.push(Delivery::new(targets, Notification::UserLeft { user_id }));
    deliveries
}
