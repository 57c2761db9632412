//! UseCase 層のエラー型

use thiserror::Error;

/// 接続（WebSocket アップグレード）時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("room limit of {0} reached")]
    RoomLimitReached(usize),

    #[error("room '{0}' is unavailable")]
    RoomUnavailable(String),

    #[error("connection has already been opened or closed")]
    NotConnecting,
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,

    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
}
