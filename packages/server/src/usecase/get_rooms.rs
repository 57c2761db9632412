//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 開かれている全ルームをルーム ID 順で返す
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, DisplayName, RoomId, Timestamp},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test]
    async fn test_get_rooms_returns_all_open_rooms() {
        // テスト項目: 開かれた全ルームがメンバー数付きで返される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let lobby = RoomId::new("lobby".to_string()).unwrap();
        let games = RoomId::new("games".to_string()).unwrap();
        repository.open_room(&lobby, Timestamp::new(0)).await.unwrap();
        repository.open_room(&games, Timestamp::new(0)).await.unwrap();
        repository
            .join(
                &lobby,
                ConnectionId::generate(),
                DisplayName::new("Ann".to_string()).unwrap(),
                Timestamp::new(1),
            )
            .await
            .unwrap();
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id, games);
        assert_eq!(rooms[0].member_count(), 0);
        assert_eq!(rooms[1].id, lobby);
        assert_eq!(rooms[1].member_count(), 1);
    }

    #[tokio::test]
    async fn test_get_rooms_empty() {
        // テスト項目: ルームがない場合は空のリストが返される
        // given (前提条件):
        let usecase = GetRoomsUseCase::new(Arc::new(InMemoryRoomRepository::default()));

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }
}
