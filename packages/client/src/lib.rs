//! Terminal chat client for Hiroba.
//!
//! Joins a room, renders server events as they arrive and sends stdin lines
//! as chat messages. Lost connections are retried and the room is re-joined
//! under the same username.

pub mod domain;
pub mod error;
pub mod event;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
