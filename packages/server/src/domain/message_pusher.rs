//! MessagePusher trait 定義
//!
//! クライアントへの通知送信のインターフェース。
//! WebSocket などの具体的な送信手段は Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    notification::{Delivery, Notification},
    value_object::ConnectionId,
};

/// 接続ごとの送信チャンネル（シリアライズ済みのメッセージを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続に通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に通知を送信（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}

/// `Delivery` を順番に送信する
///
/// 送信失敗はログに残して続行する。状態遷移は既に確定しているため。
pub async fn deliver_all(pusher: &dyn MessagePusher, deliveries: &[Delivery]) {
    for delivery in deliveries {
        if delivery.targets.is_empty() {
            continue;
        }
        if let Err(e) = pusher
            .broadcast(&delivery.targets, &delivery.notification)
            .await
        {
            tracing::warn!("Failed to deliver notification: {}", e);
        }
    }
}
