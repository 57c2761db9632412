//! UseCase: ルーム退出処理
//!
//! 退出は冪等です。既に退出済みの接続に対してはプレゼンス配信を行いません。

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, RoomId, RoomRepository};

use super::refresh_presence::RefreshPresenceUseCase;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    presence: Arc<RefreshPresenceUseCase>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, presence: Arc<RefreshPresenceUseCase>) -> Self {
        Self {
            repository,
            presence,
        }
    }

    /// ルーム退出を実行
    ///
    /// # Returns
    ///
    /// * `Some(Member)` - 退出したメンバー（残りのメンバーにプレゼンス配信済み）
    /// * `None` - 参加していなかった（何もしない）
    pub async fn execute(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member> {
        let member = self.repository.leave(room_id, connection_id).await?;

        tracing::info!(
            "'{}' left room '{}'",
            member.display_name.as_str(),
            room_id
        );
        self.presence.execute(room_id).await;

        Some(member)
    }

    /// メンバーのいなくなったルームを閉じる
    ///
    /// ルームが閉じた（または元々開いていなかった）場合は `true`
    pub async fn reclaim(&self, room_id: &RoomId) -> bool {
        let closed = self.repository.close_room(room_id).await;
        if closed {
            tracing::info!("Room '{}' is empty and has been closed", room_id);
        }
        closed
    }
}
