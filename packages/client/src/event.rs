//! Typed server events and the view state they drive.

use hiroba_server::infrastructure::dto::websocket::{ServerFrame, UserInfo};

use crate::formatter::MessageFormatter;

/// One frame received from the server
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Message {
        id: String,
        text: String,
        username: String,
        timestamp: i64,
    },
    UserCount(usize),
    UserList(Vec<UserInfo>),
    Error {
        code: String,
        message: String,
    },
    /// Valid JSON with an unrecognized shape
    Unknown(String),
    /// Not JSON at all (e.g. a plain greeting)
    NotJson(String),
}

impl ServerEvent {
    /// Decode a text frame. Never fails.
    pub fn decode(raw: &str) -> Self {
        match ServerFrame::decode(raw) {
            Ok(frame) => frame.into(),
            Err(_) if serde_json::from_str::<serde_json::Value>(raw).is_ok() => {
                Self::Unknown(raw.to_string())
            }
            Err(_) => Self::NotJson(raw.to_string()),
        }
    }
}

impl From<ServerFrame> for ServerEvent {
    fn from(frame: ServerFrame) -> Self {
        match frame {
            ServerFrame::Message {
                id,
                text,
                username,
                timestamp,
            } => Self::Message {
                id,
                text,
                username,
                timestamp,
            },
            ServerFrame::UserCount { count } => Self::UserCount(count),
            ServerFrame::UserList { users } => Self::UserList(users),
            ServerFrame::Error { code, message } => Self::Error { code, message },
        }
    }
}

/// Client-side view of the room
///
/// Events are applied one at a time in arrival order; the returned string is
/// what should be printed, if anything.
#[derive(Debug, Clone)]
pub struct ChatView {
    username: String,
    count: usize,
    users: Vec<UserInfo>,
}

impl ChatView {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            count: 0,
            users: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn users(&self) -> &[UserInfo] {
        &self.users
    }

    pub fn apply(&mut self, event: ServerEvent) -> Option<String> {
        match event {
            ServerEvent::Message {
                text,
                username,
                timestamp,
                ..
            } => {
                // Usernames are not unique, so "me" is a best-effort guess.
                let is_me = username == self.username;
                Some(MessageFormatter::format_chat_message(
                    &username, &text, timestamp, is_me,
                ))
            }
            ServerEvent::UserCount(count) => {
                // Rendered together with the following user-list.
                self.count = count;
                None
            }
            ServerEvent::UserList(users) => {
                self.count = users.len();
                self.users = users;
                Some(MessageFormatter::format_user_list(
                    &self.users,
                    &self.username,
                ))
            }
            ServerEvent::Error { code, message } => {
                Some(MessageFormatter::format_error(&code, &message))
            }
            ServerEvent::Unknown(raw) => {
                tracing::debug!("Ignoring unknown frame: {}", raw);
                None
            }
            ServerEvent::NotJson(raw) => {
                tracing::debug!("Ignoring non-JSON frame: {}", raw);
                None
            }
        }
    }
}
