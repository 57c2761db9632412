//! Conversion logic between domain entities and DTOs.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, Member, Notification, Room};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&Member> for ws::UserInfo {
    fn from(member: &Member) -> Self {
        Self {
            id: member.connection_id.as_str().to_string(),
            username: member.display_name.as_str().to_string(),
        }
    }
}

impl From<&ChatMessage> for ws::ServerFrame {
    fn from(message: &ChatMessage) -> Self {
        Self::Message {
            id: message.id.as_str().to_string(),
            text: message.text.as_str().to_string(),
            username: message.sender_name.as_str().to_string(),
            timestamp: message.sent_at.value(),
        }
    }
}

impl From<&Notification> for ws::ServerFrame {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Message(message) => message.into(),
            Notification::UserCount(count) => Self::UserCount { count: *count },
            Notification::UserList(members) => Self::UserList {
                users: members.iter().map(ws::UserInfo::from).collect(),
            },
            Notification::Error(err) => Self::Error {
                code: err.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            member_count: room.member_count(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Member> for http::MemberDetailDto {
    fn from(member: &Member) -> Self {
        Self {
            id: member.connection_id.as_str().to_string(),
            username: member.display_name.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room.members.iter().map(http::MemberDetailDto::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            message_count: room.message_count,
        }
    }
}
