//! UseCase layer: application services of the room coordinator.
//!
//! Room-affecting use cases (join, message, leave) are executed by the
//! per-room workers of [`RoomCoordinator`], never directly by connection
//! tasks.

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod refresh_presence;
mod room_coordinator;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, GetRoomDetailError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use refresh_presence::{Presence, RefreshPresenceUseCase};
pub use room_coordinator::RoomCoordinator;
pub use send_message::SendMessageUseCase;
