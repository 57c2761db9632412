//! Domain layer for the chat room coordinator.
//!
//! This module contains business logic that is independent of
//! wire formats (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, Member, Notification, Room};
pub use error::{ChatError, RepositoryError, RoomError, TransportError, ValueObjectError};
pub use registry::{ConnectionRegistry, OutboundSender};
pub use repository::RoomRepository;
pub use value_object::{
    ConnectionId, DisplayName, MessageId, MessageText, RoomId, Timestamp,
    DISPLAY_NAME_MAX_CHARS, MESSAGE_TEXT_MAX_CHARS,
};

#[cfg(test)]
pub use registry::MockConnectionRegistry;
