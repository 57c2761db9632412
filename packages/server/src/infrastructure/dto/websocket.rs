//! WebSocket frame DTOs.
//!
//! Frames are JSON objects discriminated by a `type` field.

use serde::{Deserialize, Serialize};

/// Client → server frames
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    Join {
        username: String,
    },
    Message {
        message: MessagePayload,
    },
    /// Any other `type`, kept for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Body of a client `message` frame.
///
/// Only `text` is authoritative. `id`, `username` and `timestamp` are
/// advisory and get overwritten by the server before broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePayload {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Server → client frames
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    Message {
        id: String,
        text: String,
        username: String,
        timestamp: i64,
    },
    UserCount {
        count: usize,
    },
    UserList {
        users: Vec<UserInfo>,
    },
    /// Private rejection notice, only ever sent to the originating connection
    Error {
        code: String,
        message: String,
    },
}

/// Roster entry of a `user-list` frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
}

impl ClientFrame {
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ServerFrame {
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
