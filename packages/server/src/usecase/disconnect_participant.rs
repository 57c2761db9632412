//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時の leave（ルームワーカー経由）と Registry からの登録解除
//!
//! ### なぜこのテストが必要か
//! - 切断したメンバーが Room State に残らないことを保証
//! - 残ったメンバーにだけプレゼンスが配信されることを確認
//! - 二重の切断通知が安全に無視されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加済みの接続の切断
//! - エッジケース：join 前の切断、二度目の切断

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry};

use super::room_coordinator::RoomCoordinator;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    coordinator: Arc<RoomCoordinator>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    pub fn new(coordinator: Arc<RoomCoordinator>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            coordinator,
            registry,
        }
    }

    /// 参加者切断を実行
    ///
    /// leave は参加済みかどうかに関わらず必ずルームワーカーに流す。
    /// 処理待ちの join があればその後ろに並ぶため、切断した接続がメンバーとして
    /// 残ることはない。
    ///
    /// # Returns
    ///
    /// * `Some(Connection)` - 登録解除した接続
    /// * `None` - 既に登録解除済み
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connection = self.registry.lookup(connection_id).await?;

        if let Err(e) = self
            .coordinator
            .leave(&connection.room_id, connection_id.clone())
            .await
        {
            tracing::error!("Failed to leave room for {}: {}", connection_id, e);
        }

        let removed = self.registry.unregister(connection_id).await;
        if removed.is_some() {
            tracing::debug!("Connection {} unregistered", connection_id);
        }
        removed
    }
}
