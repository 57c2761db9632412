//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::prepare() / execute() メソッド
//! - 接続先ルームの準備と Connection Registry への登録
//!
//! ### なぜこのテストが必要か
//! - ルーム数の上限を超えたアップグレードを拒否することを保証
//! - 接続直後はまだメンバーではない（join 前）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルーム・新規ルームへの接続
//! - 異常系：ルーム数の上限超過

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRegistry, OutboundSender, RepositoryError, RoomId, RoomRepository,
    Timestamp,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            registry,
            clock,
        }
    }

    /// 接続先ルームを用意する（WebSocket アップグレード前に呼ぶ）
    ///
    /// 既に存在するルームでは何もしない。
    pub async fn prepare(&self, room_id: &RoomId) -> Result<(), ConnectError> {
        let now = Timestamp::new(self.clock.now_millis());
        self.repository
            .open_room(room_id, now)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomLimitReached(max) => ConnectError::RoomLimitReached(max),
                other => ConnectError::RoomUnavailable(other.to_string()),
            })
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 接続先のルーム（URL で決まる）
    /// * `sender` - クライアントへのフレーム送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 払い出された接続 ID
    /// * `Err(ConnectError)` - ルームを用意できなかった
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender: OutboundSender,
    ) -> Result<ConnectionId, ConnectError> {
        self.prepare(&room_id).await?;

        let connected_at = Timestamp::new(self.clock.now_millis());
        let connection_id = self
            .registry
            .register(room_id.clone(), connected_at, sender)
            .await;

        tracing::debug!(
            "Connection {} registered for room '{}'",
            connection_id,
            room_id
        );

        Ok(connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{
        connection_registry::InMemoryConnectionRegistry, repository::InMemoryRoomRepository,
    };
    use hiroba_shared::time::FixedClock;

    fn create_usecase(
        max_rooms: usize,
    ) -> (
        ConnectParticipantUseCase,
        Arc<InMemoryRoomRepository>,
        Arc<InMemoryConnectionRegistry>,
    ) {
        let repository = Arc::new(InMemoryRoomRepository::new(max_rooms, 8));
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectParticipantUseCase::new(
            repository.clone(),
            registry.clone(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        (usecase, repository, registry)
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_connect_registers_connection_without_membership() {
        // テスト項目: 接続すると Registry に登録されるが、まだメンバーではない
        // given (前提条件):
        let (usecase, repository, registry) = create_usecase(4);
        let (tx, _rx) = tokio::sync::mpsc::channel(8);

        // when (操作):
        let connection_id = usecase.execute(room("lobby"), tx).await.unwrap();

        // then (期待する結果):
        let connection = registry.lookup(&connection_id).await.unwrap();
        assert_eq!(connection.room_id, room("lobby"));
        assert_eq!(connection.connected_at, Timestamp::new(1_700_000_000_000));
        assert!(!connection.has_joined());
        assert!(repository.get_room(&room("lobby")).await.is_some());
        assert_eq!(repository.count(&room("lobby")).await, 0);
    }

    #[tokio::test]
    async fn test_connect_to_existing_room_reuses_it() {
        // テスト項目: 既存ルームへの接続ではルームが増えない
        // given (前提条件):
        let (usecase, repository, registry) = create_usecase(1);
        let (tx1, _rx1) = tokio::sync::mpsc::channel(8);
        let (tx2, _rx2) = tokio::sync::mpsc::channel(8);

        // when (操作):
        let first = usecase.execute(room("lobby"), tx1).await.unwrap();
        let second = usecase.execute(room("lobby"), tx2).await.unwrap();

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(repository.get_rooms().await.len(), 1);
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_connect_rejected_when_room_limit_reached() {
        // テスト項目: ルーム数の上限を超える接続は拒否され、登録もされない
        // given (前提条件):
        let (usecase, _repository, registry) = create_usecase(1);
        usecase.prepare(&room("lobby")).await.unwrap();
        let (tx, _rx) = tokio::sync::mpsc::channel(8);

        // when (操作):
        let result = usecase.execute(room("another"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::RoomLimitReached(1)));
        assert_eq!(registry.count().await, 0);
    }
}
