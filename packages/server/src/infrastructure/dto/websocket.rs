//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `type`, e.g.
//! `{"type":"join-room","room":"r","userId":"u1","username":"Alice"}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Keep a field that is present (even when it is `null`) as `Some`.
///
/// Combined with `#[serde(default)]`, an absent field stays `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Client → server messages
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    JoinRoom {
        room: Option<String>,
        user_id: Option<String>,
        username: Option<String>,
    },
    LeaveRoom {
        room: Option<String>,
        user_id: Option<String>,
    },
    Signal {
        room: Option<String>,
        target_user: Option<String>,
        from_user: Option<String>,
        #[serde(default, deserialize_with = "present")]
        description: Option<Value>,
        #[serde(default, deserialize_with = "present")]
        candidate: Option<Value>,
    },
    StartScreenShare {
        room: Option<String>,
        user_id: Option<String>,
        username: Option<String>,
    },
    StopScreenShare {
        room: Option<String>,
        user_id: Option<String>,
    },
}

/// Participant entry of a `room-users` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub username: String,
    pub connection_id: String,
    pub joined_at: i64,
}

/// Server → client messages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    UserJoined {
        user_id: String,
        username: String,
        room_users: Vec<String>,
        screen_sharer: Option<String>,
    },
    RoomUsers {
        users: BTreeMap<String, ParticipantInfo>,
        screen_sharer: Option<String>,
    },
    UserLeft {
        user_id: String,
    },
    Signal {
        room: String,
        from_user: String,
        target_user: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        candidate: Option<Value>,
    },
    ScreenShareStarted {
        user_id: String,
        username: String,
    },
    ScreenShareStopped {
        user_id: String,
    },
    Error {
        message: String,
    },
}
