//! Room State implementations.

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
