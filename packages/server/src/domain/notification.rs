//! クライアントへの通知
//!
//! UseCase は状態遷移の結果を `Delivery`（宛先 + 通知内容）として組み立て、
//! `MessagePusher` に渡します。ワイヤーフォーマットへの変換は Infrastructure 層の責務です。

use serde_json::Value;

use super::{
    entity::Participant,
    value_object::{ConnectionId, DisplayName, RoomId, UserId},
};

/// シグナリングのペイロード（SDP description / ICE candidate）
///
/// 中身は解釈しない。入力に存在したフィールドだけが `Some` になる（`null` も含む）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalPayload {
    pub description: Option<Value>,
    pub candidate: Option<Value>,
}

/// 中継されるシグナリングメッセージ
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEnvelope {
    pub room_id: RoomId,
    /// 送信者（未指定の場合は送信元の接続 ID）
    pub from_user: String,
    /// クライアントが指定した宛先（UserId として不正な値でもそのまま転送する）
    pub target_user: Option<String>,
    pub payload: SignalPayload,
}

/// クライアントへの通知内容
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    UserJoined {
        user_id: UserId,
        display_name: DisplayName,
        room_users: Vec<UserId>,
        screen_sharer: Option<UserId>,
    },
    RoomUsers {
        participants: Vec<Participant>,
        screen_sharer: Option<UserId>,
    },
    UserLeft {
        user_id: UserId,
    },
    Signal(SignalEnvelope),
    ScreenShareStarted {
        user_id: UserId,
        display_name: DisplayName,
    },
    ScreenShareStopped {
        user_id: UserId,
    },
    Error {
        message: String,
    },
}

/// 宛先付きの通知
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub targets: Vec<ConnectionId>,
    pub notification: Notification,
}

impl Delivery {
    pub fn new(targets: Vec<ConnectionId>, notification: Notification) -> Self {
        Self {
            targets,
            notification,
        }
    }

    pub fn to_one(target: ConnectionId, notification: Notification) -> Self {
        Self::new(vec![target], notification)
    }
}
