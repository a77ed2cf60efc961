//! ドメイン層
//!
//! Room・参加者・接続の値とエンティティ、通知、および
//! Infrastructure 層が実装する trait（Repository / MessagePusher）を定義します。

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use entity::{ConnectionBinding, Participant, Room, RoomSnapshot};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel, deliver_all};
pub use notification::{Delivery, Notification, SignalEnvelope, SignalPayload};
pub use policy::{DuplicateJoinPolicy, DuplicateJoinResolution, resolve_duplicate_join};
pub use repository::{
    ConnectionDirectory, JoinedRoom, ParticipantRemoval, RegistryStats, RoomRegistry,
    ScreenShareChange,
};
pub use value_object::{ConnectionId, DisplayName, RoomId, Timestamp, UserId};
