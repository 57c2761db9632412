//! Infrastructure layer: wire formats and in-memory implementations of the
//! domain traits.

pub mod connection_registry;
pub mod dto;
pub mod repository;
