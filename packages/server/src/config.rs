//! Server configuration.

use crate::{
    domain::entity::DEFAULT_ROOM_CAPACITY, infrastructure::repository::inmemory::DEFAULT_MAX_ROOMS,
};

/// Room used when a client connects to `/ws` without `?room=`
pub const DEFAULT_ROOM: &str = "anonymous-chat";

/// Frames buffered per connection before new frames are dropped
pub const DEFAULT_OUTBOUND_BUFFER: usize = 128;

/// Runtime settings of the chat server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub default_room: String,
    /// Upper bound on concurrently open rooms (one worker task each)
    pub max_rooms: usize,
    pub max_members_per_room: usize,
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            default_room: DEFAULT_ROOM.to_string(),
            max_rooms: DEFAULT_MAX_ROOMS,
            max_members_per_room: DEFAULT_ROOM_CAPACITY,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
