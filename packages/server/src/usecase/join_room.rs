//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 表示名の検証、二重参加の拒否、参加後のプレゼンス配信
//!
//! ### なぜこのテストが必要か
//! - 不正な表示名がルームに入らないことを保証
//! - 拒否された join がメンバー構成を変えないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規メンバーの参加
//! - 異常系：長すぎる表示名、二重参加

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatError, ConnectionId, ConnectionRegistry, DisplayName, Member, RoomId, RoomRepository,
    Timestamp,
};

use super::refresh_presence::RefreshPresenceUseCase;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    presence: Arc<RefreshPresenceUseCase>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        presence: Arc<RefreshPresenceUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            registry,
            presence,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加先のルーム
    /// * `connection_id` - 参加する接続
    /// * `username` - クライアントが名乗った表示名（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(Member)` - 参加成功（プレゼンス配信済み）
    /// * `Err(ChatError::InvalidName | AlreadyJoined | RoomFull)` - 参加失敗（メンバー構成は不変）
    /// * `Err(ChatError::RoomUnavailable)` - 閉じられたルームを開き直せなかった
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        username: String,
    ) -> Result<Member, ChatError> {
        // 1. 表示名の検証
        let display_name = DisplayName::new(username)?;

        // 2. Room State にメンバーを追加
        //    接続後、join 前にルームが閉じられていた場合は開き直す
        let joined_at = Timestamp::new(self.clock.now_millis());
        self.repository.open_room(room_id, joined_at).await?;
        let member = self
            .repository
            .join(room_id, connection_id.clone(), display_name.clone(), joined_at)
            .await?;

        // 3. Registry に表示名を紐付け
        self.registry
            .bind_display_name(&connection_id, display_name)
            .await;

        tracing::info!(
            "'{}' joined room '{}' as connection '{}'",
            member.display_name.as_str(),
            room_id,
            connection_id
        );

        // 4. プレゼンス配信
        self.presence.execute(room_id).await;

        Ok(member)
    }
}
