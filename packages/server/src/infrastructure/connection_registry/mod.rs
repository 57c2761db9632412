//! Connection Registry の実装
//!
//! - `inmemory`: プロセス内の HashMap と WebSocket 送信チャンネルを使った実装

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
