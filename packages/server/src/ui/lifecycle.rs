//! Connection Lifecycle Handler.
//!
//! Each WebSocket session owns one [`ConnectionLifecycle`]. It registers the
//! connection on `open` and releases it exactly once, whichever of `close`,
//! `fail` or `Drop` comes first.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, OutboundSender, RoomId},
    usecase::{ConnectError, ConnectParticipantUseCase, DisconnectParticipantUseCase},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Connecting,
    Open,
    Closed,
    Errored,
}

impl LifecycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

pub struct ConnectionLifecycle {
    state: LifecycleState,
    room_id: RoomId,
    connection_id: Option<ConnectionId>,
    connect: Arc<ConnectParticipantUseCase>,
    disconnect: Arc<DisconnectParticipantUseCase>,
}

impl ConnectionLifecycle {
    pub fn new(
        room_id: RoomId,
        connect: Arc<ConnectParticipantUseCase>,
        disconnect: Arc<DisconnectParticipantUseCase>,
    ) -> Self {
        Self {
            state: LifecycleState::Connecting,
            room_id,
            connection_id: None,
            connect,
            disconnect,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// `Connecting -> Open`: register the connection with the registry
    pub async fn open(&mut self, sender: OutboundSender) -> Result<ConnectionId, ConnectError> {
        if self.state != LifecycleState::Connecting {
            return Err(ConnectError::NotConnecting);
        }

        match self.connect.execute(self.room_id.clone(), sender).await {
            Ok(connection_id) => {
                self.connection_id = Some(connection_id.clone());
                self.state = LifecycleState::Open;
                tracing::info!(
                    "Connection {} opened on room '{}'",
                    connection_id,
                    self.room_id
                );
                Ok(connection_id)
            }
            Err(e) => {
                self.state = LifecycleState::Errored;
                Err(e)
            }
        }
    }

    /// `Open -> Closed`. No-op in any other state.
    pub async fn close(&mut self) {
        if let Some(connection_id) = self.finish(LifecycleState::Closed) {
            tracing::info!("Connection {} closed", connection_id);
            self.disconnect.execute(&connection_id).await;
        }
    }

    /// `Open -> Errored`. No-op in any other state.
    pub async fn fail(&mut self, reason: &str) {
        if let Some(connection_id) = self.finish(LifecycleState::Errored) {
            tracing::warn!("Connection {} failed: {}", connection_id, reason);
            self.disconnect.execute(&connection_id).await;
        }
    }

    fn finish(&mut self, next: LifecycleState) -> Option<ConnectionId> {
        if self.state != LifecycleState::Open {
            return None;
        }
        self.state = next;
        self.connection_id.clone()
    }
}

impl Drop for ConnectionLifecycle {
    fn drop(&mut self) {
        let Some(connection_id) = self.finish(LifecycleState::Errored) else {
            return;
        };

        // Session task was aborted without a terminal signal.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!("Connection {} dropped while open, releasing", connection_id);
                let disconnect = self.disconnect.clone();
                handle.spawn(async move {
                    disconnect.execute(&connection_id).await;
                });
            }
            Err(_) => {
                tracing::error!(
                    "Connection {} dropped outside a runtime and was not released",
                    connection_id
                );
            }
        }
    }
}
