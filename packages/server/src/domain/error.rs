//! Domain error types.

use thiserror::Error;

/// Validation errors raised when constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("invalid room id '{0}'")]
    InvalidRoomId(String),

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("display name is {len} characters long (max {max})")]
    DisplayNameTooLong { len: usize, max: usize },

    #[error("display name contains non-printable characters")]
    NonPrintableDisplayName,

    #[error("message text must not be empty")]
    EmptyMessageText,

    #[error("message text is {len} characters long (max {max})")]
    MessageTextTooLong { len: usize, max: usize },
}

/// Errors raised by the `Room` entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("connection has already joined this room")]
    AlreadyJoined,

    #[error("room is full (capacity {0})")]
    RoomFull(usize),
}

/// Errors raised by Room State (`RoomRepository`)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection has already joined room '{0}'")]
    AlreadyJoined(String),

    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room limit of {0} reached")]
    RoomLimitReached(usize),
}

/// Best-effort delivery failures towards a single connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("connection '{0}' is closed")]
    Closed(String),

    #[error("outbound buffer of connection '{0}' is full")]
    Backpressure(String),

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Protocol-level error taxonomy of the room coordinator
///
/// Rejections (`InvalidName` .. `RoomUnavailable`) are reported privately to the
/// originating connection. `MalformedFrame` and `TransportFailure` are only
/// logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("invalid display name: {0}")]
    InvalidName(String),

    #[error("connection has already joined a room")]
    AlreadyJoined,

    #[error("join the room before sending messages")]
    NotJoined,

    #[error("message text must not be empty")]
    EmptyMessage,

    #[error("message text exceeds {max} characters")]
    MessageTooLong { max: usize },

    #[error("room is full")]
    RoomFull,

    #[error("room unavailable: {0}")]
    RoomUnavailable(String),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl ChatError {
    /// Stable machine-readable code sent in `error` frames
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "invalid-name",
            Self::AlreadyJoined => "already-joined",
            Self::NotJoined => "not-joined",
            Self::EmptyMessage => "empty-message",
            Self::MessageTooLong { .. } => "message-too-long",
            Self::RoomFull => "room-full",
            Self::RoomUnavailable(_) => "room-unavailable",
            Self::MalformedFrame(_) => "malformed-frame",
            Self::TransportFailure(_) => "transport-failure",
        }
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(err: ValueObjectError) -> Self {
        match err {
            ValueObjectError::EmptyMessageText => Self::EmptyMessage,
            ValueObjectError::MessageTextTooLong { max, .. } => Self::MessageTooLong { max },
            other => Self::InvalidName(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ChatError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadyJoined(_) => Self::AlreadyJoined,
            RepositoryError::RoomFull(_) => Self::RoomFull,
            other => Self::RoomUnavailable(other.to_string()),
        }
    }
}

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        Self::TransportFailure(err.to_string())
    }
}
