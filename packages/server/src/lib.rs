//! Hiroba chat room coordinator.
//!
//! Browser and terminal clients connect to a room over WebSocket, join it
//! under a display name, exchange chat messages and see a live roster.
//! The crate is layered the usual way: `domain` holds the model and the
//! repository/registry abstractions, `infrastructure` the in-memory
//! implementations and wire DTOs, `usecase` the application services and
//! `ui` the axum transport.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
