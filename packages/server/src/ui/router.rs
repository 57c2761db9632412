//! Message Router: decodes inbound frames and dispatches them.

use std::sync::Arc;

use crate::{
    domain::{ChatError, ConnectionId, ConnectionRegistry, Notification},
    infrastructure::dto::websocket::ClientFrame,
    usecase::RoomCoordinator,
};

/// Result of handling one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Join or message accepted by the room
    Accepted,
    /// Rejected; an `error` frame was sent to the originator only
    Rejected(ChatError),
    /// Malformed frame, unknown type or unregistered connection
    Ignored,
}

pub struct MessageRouter {
    coordinator: Arc<RoomCoordinator>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl MessageRouter {
    pub fn new(coordinator: Arc<RoomCoordinator>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            coordinator,
            registry,
        }
    }

    /// Handle one raw text frame received on `connection_id`.
    ///
    /// Never fails: rejections are reported privately to the originator and
    /// malformed input is logged and dropped, so the session stays open.
    pub async fn handle(&self, connection_id: &ConnectionId, raw: &str) -> RouteOutcome {
        let Some(connection) = self.registry.lookup(connection_id).await else {
            tracing::warn!("Frame from unregistered connection {} dropped", connection_id);
            return RouteOutcome::Ignored;
        };

        let frame = match ClientFrame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                let error = ChatError::MalformedFrame(e.to_string());
                tracing::warn!("{} from {}: {}", error, connection_id, raw);
                return RouteOutcome::Ignored;
            }
        };

        let result = match frame {
            ClientFrame::Join { username } => self
                .coordinator
                .join(&connection.room_id, connection_id.clone(), username)
                .await
                .map(|_| ()),
            ClientFrame::Message { message } => self
                .coordinator
                .send_message(&connection.room_id, connection_id.clone(), message.text)
                .await
                .map(|_| ()),
            ClientFrame::Unknown => {
                tracing::debug!("Unknown frame type from {}: {}", connection_id, raw);
                return RouteOutcome::Ignored;
            }
        };

        match result {
            Ok(()) => RouteOutcome::Accepted,
            Err(error) => self.reject(connection_id, error).await,
        }
    }

    async fn reject(&self, connection_id: &ConnectionId, error: ChatError) -> RouteOutcome {
        tracing::info!("Rejected frame from {}: {}", connection_id, error);

        if let Err(e) = self
            .registry
            .push_to(connection_id, &Notification::Error(error.clone()))
            .await
        {
            tracing::warn!("Failed to deliver error to {}: {}", connection_id, e);
        }

        RouteOutcome::Rejected(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockConnectionRegistry, RoomId, RoomRepository, Timestamp, TransportError},
        infrastructure::{
            connection_registry::InMemoryConnectionRegistry, repository::InMemoryRoomRepository,
        },
        usecase::{JoinRoomUseCase, LeaveRoomUseCase, RefreshPresenceUseCase, SendMessageUseCase},
    };
    use hiroba_shared::time::SystemClock;
    use tokio::sync::mpsc;

    async fn create_coordinator(
        registry: Arc<dyn ConnectionRegistry>,
    ) -> (Arc<RoomCoordinator>, Arc<InMemoryRoomRepository>, RoomId) {
        let repository = Arc::new(InMemoryRoomRepository::default());
        let lobby = RoomId::new("lobby".to_string()).unwrap();
        repository.open_room(&lobby, Timestamp::new(0)).await.unwrap();
        let clock = Arc::new(SystemClock);
        let presence = Arc::new(RefreshPresenceUseCase::new(
            repository.clone(),
            registry.clone(),
        ));
        let coordinator = Arc::new(RoomCoordinator::new(
            Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                registry.clone(),
                presence.clone(),
                clock.clone(),
            )),
            Arc::new(SendMessageUseCase::new(
                repository.clone(),
                registry.clone(),
                clock,
            )),
            Arc::new(LeaveRoomUseCase::new(repository.clone(), presence)),
        ));
        (coordinator, repository, lobby)
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(raw) = rx.try_recv() {
            frames.push(serde_json::from_str(&raw).unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn test_join_then_message_is_accepted() {
        // テスト項目: join と message が受理され、送信者自身にもメッセージが届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (coordinator, repository, lobby) = create_coordinator(registry.clone()).await;
        let router = MessageRouter::new(coordinator, registry.clone());
        let (tx, mut rx) = mpsc::channel(16);
        let ann = registry.register(lobby.clone(), Timestamp::new(0), tx).await;

        // when (操作):
        let joined = router
            .handle(&ann, r#"{"type":"join","username":"Ann"}"#)
            .await;
        let sent = router
            .handle(
                &ann,
                r#"{"type":"message","message":{"text":"hi","username":"Mallory","id":"x"}}"#,
            )
            .await;

        // then (期待する結果):
        assert_eq!(joined, RouteOutcome::Accepted);
        assert_eq!(sent, RouteOutcome::Accepted);
        assert_eq!(repository.count(&lobby).await, 1);
        let frames = drain(&mut rx);
        let types: Vec<&str> = frames.iter().map(|f| f["type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["user-count", "user-list", "message"]);
        assert_eq!(frames[2]["username"], "Ann");
        assert_eq!(frames[2]["text"], "hi");
        assert_ne!(frames[2]["id"], "x");
    }

    #[tokio::test]
    async fn test_message_before_join_is_rejected_privately() {
        // テスト項目: join 前の message は NotJoined で拒否され、本人にだけ error が届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (coordinator, _repository, lobby) = create_coordinator(registry.clone()).await;
        let router = MessageRouter::new(coordinator, registry.clone());
        let (bob_tx, mut bob_rx) = mpsc::channel(16);
        let bob = registry.register(lobby.clone(), Timestamp::new(0), bob_tx).await;
        router
            .handle(&bob, r#"{"type":"join","username":"Bob"}"#)
            .await;
        drain(&mut bob_rx);
        let (tx, mut rx) = mpsc::channel(16);
        let lurker = registry.register(lobby.clone(), Timestamp::new(0), tx).await;

        // when (操作):
        let outcome = router
            .handle(&lurker, r#"{"type":"message","message":{"text":"hi"}}"#)
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RouteOutcome::Rejected(ChatError::NotJoined));
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "error");
        assert_eq!(frames[0]["code"], "not-joined");
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_frames_are_ignored() {
        // テスト項目: 不正なフレームや未知の type は無視される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (coordinator, _repository, lobby) = create_coordinator(registry.clone()).await;
        let router = MessageRouter::new(coordinator, registry.clone());
        let (tx, mut rx) = mpsc::channel(16);
        let ann = registry.register(lobby, Timestamp::new(0), tx).await;

        // when (操作):
        let outcomes = vec![
            router.handle(&ann, "hello").await,
            router.handle(&ann, r#"{"type":"join"}"#).await,
            router.handle(&ann, r#"[1,2,3]"#).await,
            router.handle(&ann, r#"{"type":"typing","who":"Ann"}"#).await,
        ];

        // then (期待する結果):
        assert!(outcomes.iter().all(|o| *o == RouteOutcome::Ignored));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_join_is_rejected() {
        // テスト項目: 二度目の join は AlreadyJoined で拒否される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (coordinator, repository, lobby) = create_coordinator(registry.clone()).await;
        let router = MessageRouter::new(coordinator, registry.clone());
        let (tx, mut rx) = mpsc::channel(16);
        let ann = registry.register(lobby.clone(), Timestamp::new(0), tx).await;
        router
            .handle(&ann, r#"{"type":"join","username":"Ann"}"#)
            .await;
        drain(&mut rx);

        // when (操作):
        let outcome = router
            .handle(&ann, r#"{"type":"join","username":"Annie"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RouteOutcome::Rejected(ChatError::AlreadyJoined));
        assert_eq!(repository.count(&lobby).await, 1);
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["code"], "already-joined");
    }

    #[tokio::test]
    async fn test_unregistered_connection_is_ignored() {
        // テスト項目: 登録されていない接続からのフレームは何も送らずに無視される
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry.expect_lookup().returning(|_| None);
        registry.expect_push_to().times(0);
        registry.expect_broadcast().times(0);
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(registry);
        let (coordinator, _repository, _lobby) = create_coordinator(registry.clone()).await;
        let router = MessageRouter::new(coordinator, registry);

        // when (操作):
        let outcome = router
            .handle(
                &ConnectionId::generate(),
                r#"{"type":"join","username":"Ann"}"#,
            )
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RouteOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_rejection_survives_closed_originator() {
        // テスト項目: 拒否通知の送信に失敗しても Rejected が返る
        // given (前提条件):
        let lobby = RoomId::new("lobby".to_string()).unwrap();
        let mut registry = MockConnectionRegistry::new();
        registry.expect_lookup().returning(move |id| {
            Some(crate::domain::Connection::new(
                id.clone(),
                lobby.clone(),
                Timestamp::new(0),
            ))
        });
        registry
            .expect_push_to()
            .times(1)
            .returning(|id, _| Err(TransportError::Closed(id.to_string())));
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(registry);
        let (coordinator, _repository, _lobby) = create_coordinator(registry.clone()).await;
        let router = MessageRouter::new(coordinator, registry);

        // when (操作):
        let outcome = router
            .handle(
                &ConnectionId::generate(),
                r#"{"type":"message","message":{"text":"hi"}}"#,
            )
            .await;

        // then (期待する結果):
        assert_eq!(outcome, RouteOutcome::Rejected(ChatError::NotJoined));
    }
}
