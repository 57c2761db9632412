//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
    pub created_at: String,
}

/// Member entry of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberDetailDto {
    pub id: String,
    pub username: String,
    pub joined_at: String,
}

/// Response of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDetailDto {
    pub id: String,
    /// Members in join order
    pub members: Vec<MemberDetailDto>,
    pub created_at: String,
    pub message_count: u64,
}
