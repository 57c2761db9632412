//! HashMap を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続毎の識別情報（対象ルーム・表示名）と送信チャンネルを管理
//! - クライアントへのフレーム送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信チャンネルを受け取り、フレームの送信に使用します。
//! 送信は `try_send` による非ブロッキングのエンキューのみで、
//! 遅いクライアントの送信バッファが一杯の場合はそのフレームを破棄します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionRegistry, DisplayName, Notification, OutboundSender,
        RoomId, Timestamp, TransportError,
    },
    infrastructure::dto::websocket::ServerFrame,
};

struct ConnectionEntry {
    connection: Connection,
    sender: OutboundSender,
}

/// インメモリ ConnectionRegistry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: ConnectionId
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(notification: &Notification) -> Result<String, TransportError> {
    ServerFrame::from(notification)
        .encode()
        .map_err(|e| TransportError::Encode(e.to_string()))
}

fn enqueue(
    connection_id: &ConnectionId,
    sender: &OutboundSender,
    frame: String,
) -> Result<(), TransportError> {
    sender.try_send(frame).map_err(|e| match e {
        TrySendError::Full(_) => TransportError::Backpressure(connection_id.to_string()),
        TrySendError::Closed(_) => TransportError::Closed(connection_id.to_string()),
    })
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        room_id: RoomId,
        connected_at: Timestamp,
        sender: OutboundSender,
    ) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        let connection = Connection::new(connection_id.clone(), room_id, connected_at);

        let mut connections = self.connections.lock().await;
        connections.insert(connection_id.clone(), ConnectionEntry { connection, sender });
        tracing::debug!("Connection '{}' registered", connection_id);

        connection_id
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(connection_id).map(|entry| entry.connection);
        if removed.is_some() {
            tracing::debug!("Connection '{}' unregistered", connection_id);
        }
        removed
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .map(|entry| entry.connection.clone())
    }

    async fn bind_display_name(&self, connection_id: &ConnectionId, display_name: DisplayName) {
        let mut connections = self.connections.lock().await;
        if let Some(entry) = connections.get_mut(connection_id) {
            entry.connection.display_name = Some(display_name);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), TransportError> {
        let frame = encode(notification)?;
        let connections = self.connections.lock().await;

        let entry = connections
            .get(connection_id)
            .ok_or_else(|| TransportError::ConnectionNotFound(connection_id.to_string()))?;
        enqueue(connection_id, &entry.sender, frame)?;
        tracing::debug!("Pushed frame to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionId], notification: &Notification) -> usize {
        let frame = match encode(notification) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Dropping broadcast: {}", e);
                return 0;
            }
        };

        let connections = self.connections.lock().await;
        let mut delivered = 0;

        for target in targets {
            let Some(entry) = connections.get(target) else {
                // ブロードキャストでは一部の送信失敗を許容
                tracing::warn!("Connection '{}' not found during broadcast, skipping", target);
                continue;
            };
            match enqueue(target, &entry.sender, frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to push frame: {}", e),
            }
        }

        delivered
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
