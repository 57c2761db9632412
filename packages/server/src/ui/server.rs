//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use hiroba_shared::time::Clock;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::RoomId,
    infrastructure::{
        connection_registry::InMemoryConnectionRegistry, repository::InMemoryRoomRepository,
    },
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RefreshPresenceUseCase,
        RoomCoordinator, SendMessageUseCase,
    },
};

use super::{
    handler::{
        get_room_detail, get_rooms, health_check, party_websocket_handler, websocket_handler,
    },
    router::MessageRouter,
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(ServerConfig::default(), Arc::new(SystemClock))?;
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Wire every layer for the given configuration
    pub fn new(config: ServerConfig, clock: Arc<dyn Clock>) -> Result<Self, ServerError> {
        let default_room = RoomId::new(config.default_room.clone())?;

        // 1. Repository / Registry（インメモリ実装）
        let repository = Arc::new(InMemoryRoomRepository::new(
            config.max_rooms,
            config.max_members_per_room,
        ));
        let registry = Arc::new(InMemoryConnectionRegistry::new());

        // 2. ルーム単位で直列化されるユースケース
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
                clock.clone(),
            )),
            Arc::new(LeaveRoomUseCase::new(repository.clone(), presence)),
        )
        // 既定ルームは空になっても閉じない
        .with_pinned_room(default_room.clone()));

        // 3. 接続単位のユースケース
        let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
            repository.clone(),
            registry.clone(),
            clock,
        ));
        let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
            coordinator.clone(),
            registry.clone(),
        ));

        // 4. AppState
        let state = Arc::new(AppState {
            connect_participant_usecase,
            disconnect_participant_usecase,
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            router: Arc::new(MessageRouter::new(coordinator, registry)),
            default_room,
            outbound_buffer: config.outbound_buffer.max(1),
        });

        Ok(Self { config, state })
    }

    /// Routes of the chat server
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            .route("/parties/{party}/{room}", get(party_websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(
        self,
        listener: tokio::net::TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // The default room always exists, even before anyone connects.
        self.state
            .connect_participant_usecase
            .prepare(&self.state.default_room)
            .await?;
        tracing::info!("Room '{}' created!", self.state.default_room);

        let app = self.router();

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
