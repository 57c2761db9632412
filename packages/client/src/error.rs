//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the WebSocket upgrade (bad room id, room limit)
    #[error("Server rejected the connection with HTTP {0}")]
    UpgradeRejected(u16),

    /// Username fails the same bounds the server enforces
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
