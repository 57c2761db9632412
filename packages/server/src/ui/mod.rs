//! WebSocket chat server implementation.

mod handler;
pub mod lifecycle;
pub mod router;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
