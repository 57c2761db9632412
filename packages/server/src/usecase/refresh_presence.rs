//! UseCase: プレゼンス配信（Presence Broadcaster）
//!
//! Room State から一つのスナップショットを取り、`user-count` と `user-list` を
//! ルームの全メンバーに配信します。人数と一覧は同じスナップショットから
//! 計算されるため、互いに矛盾しません。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, Member, Notification, RoomId, RoomRepository};

/// 配信したプレゼンスのスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub count: usize,
    /// 参加順
    pub members: Vec<Member>,
}

/// プレゼンス配信のユースケース
pub struct RefreshPresenceUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl RefreshPresenceUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// ルームのプレゼンスを再計算して全メンバーに配信
    pub async fn execute(&self, room_id: &RoomId) -> Presence {
        let members = self.repository.members_of(room_id).await;
        let presence = Presence {
            count: members.len(),
            members,
        };

        let targets: Vec<ConnectionId> = presence
            .members
            .iter()
            .map(|m| m.connection_id.clone())
            .collect();
        if targets.is_empty() {
            return presence;
        }

        let delivered = self
            .registry
            .broadcast(&targets, &Notification::UserCount(presence.count))
            .await;
        self.registry
            .broadcast(&targets, &Notification::UserList(presence.members.clone()))
            .await;

        tracing::debug!(
            "Presence of room '{}' refreshed: {} online, delivered to {}/{}",
            room_id,
            presence.count,
            delivered,
            targets.len()
        );

        presence
    }
}
