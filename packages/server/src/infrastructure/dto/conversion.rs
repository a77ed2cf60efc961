//! Conversion logic between DTOs and domain entities.

use tsunagi_shared::time::timestamp_to_rfc3339;

use crate::domain::{Notification, Participant, RoomSnapshot, UserId};
use crate::infrastructure::dto::{http, websocket as dto};

fn user_ids_to_strings(user_ids: &[UserId]) -> Vec<String> {
    user_ids.iter().map(|id| id.as_str().to_string()).collect()
}

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<&Participant> for dto::ParticipantInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            username: participant.display_name.as_str().to_string(),
            connection_id: participant.connection_id.as_str().to_string(),
            joined_at: participant.joined_at.value(),
        }
    }
}

impl From<&Notification> for dto::ServerMessage {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::UserJoined {
                user_id,
                display_name,
                room_users,
                screen_sharer,
            } => Self::UserJoined {
                user_id: user_id.as_str().to_string(),
                username: display_name.as_str().to_string(),
                room_users: user_ids_to_strings(room_users),
                screen_sharer: screen_sharer.as_ref().map(|id| id.as_str().to_string()),
            },
            Notification::RoomUsers {
                participants,
                screen_sharer,
            } => Self::RoomUsers {
                users: participants
                    .iter()
                    .map(|p| (p.user_id.as_str().to_string(), dto::ParticipantInfo::from(p)))
                    .collect(),
                screen_sharer: screen_sharer.as_ref().map(|id| id.as_str().to_string()),
            },
            Notification::UserLeft { user_id } => Self::UserLeft {
                user_id: user_id.as_str().to_string(),
            },
            Notification::Signal(envelope) => Self::Signal {
                room: envelope.room_id.as_str().to_string(),
                from_user: envelope.from_user.clone(),
                target_user: envelope.target_user.clone(),
                description: envelope.payload.description.clone(),
                candidate: envelope.payload.candidate.clone(),
            },
            Notification::ScreenShareStarted {
                user_id,
                display_name,
            } => Self::ScreenShareStarted {
                user_id: user_id.as_str().to_string(),
                username: display_name.as_str().to_string(),
            },
            Notification::ScreenShareStopped { user_id } => Self::ScreenShareStopped {
                user_id: user_id.as_str().to_string(),
            },
            Notification::Error { message } => Self::Error {
                message: message.clone(),
            },
        }
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<RoomSnapshot> for http::RoomSummaryDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            participants: user_ids_to_strings(&snapshot.user_ids()),
            id: snapshot.room_id.into_string(),
            screen_sharer: snapshot.screen_sharer.map(UserId::into_string),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

impl From<RoomSnapshot> for http::RoomDetailDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            participants: snapshot
                .participants
                .into_iter()
                .map(|p| http::ParticipantDetailDto {
                    user_id: p.user_id.into_string(),
                    username: p.display_name.into_string(),
                    joined_at: timestamp_to_rfc3339(p.joined_at.value()),
                })
                .collect(),
            id: snapshot.room_id.into_string(),
            screen_sharer: snapshot.screen_sharer.map(UserId::into_string),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}
