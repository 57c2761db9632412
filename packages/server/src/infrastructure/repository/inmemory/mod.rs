//! In-memory implementations of the repository traits.

mod room;

pub use room::{DEFAULT_MAX_ROOMS, InMemoryRoomRepository};
