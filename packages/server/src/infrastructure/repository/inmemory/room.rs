//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ルーム本体と「接続 → 参加ルーム」の索引を一つのロックで保護するため、
//! `join` による二重参加チェックと追加は不可分に行われます。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, Member, RepositoryError, Room, RoomError, RoomId, RoomRepository,
    Timestamp,
};

/// Default upper bound on the number of open rooms
pub const DEFAULT_MAX_ROOMS: usize = 64;

#[derive(Default)]
struct RoomTable {
    /// Room ID 順に保持（一覧 API の順序を決定的にするため）
    rooms: BTreeMap<RoomId, Room>,
    /// 接続が参加しているルームの索引
    memberships: HashMap<ConnectionId, RoomId>,
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    table: Mutex<RoomTable>,
    max_rooms: usize,
    room_capacity: usize,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    ///
    /// * `max_rooms` - 同時に開けるルーム数の上限
    /// * `room_capacity` - ルーム毎のメンバー数の上限
    pub fn new(max_rooms: usize, room_capacity: usize) -> Self {
        Self {
            table: Mutex::new(RoomTable::default()),
            max_rooms,
            room_capacity,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROOMS, crate::domain::entity::DEFAULT_ROOM_CAPACITY)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn open_room(
        &self,
        room_id: &RoomId,
        created_at: Timestamp,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        if table.rooms.contains_key(room_id) {
            return Ok(());
        }
        if table.rooms.len() >= self.max_rooms {
            return Err(RepositoryError::RoomLimitReached(self.max_rooms));
        }
        table.rooms.insert(
            room_id.clone(),
            Room::with_capacity(room_id.clone(), created_at, self.room_capacity),
        );
        tracing::debug!("Room '{}' opened", room_id);
        Ok(())
    }

    async fn close_room(&self, room_id: &RoomId) -> bool {
        let mut table = self.table.lock().await;
        match table.rooms.get(room_id) {
            None => true,
            Some(room) if room.members.is_empty() => {
                table.rooms.remove(room_id);
                tracing::debug!("Room '{}' closed", room_id);
                true
            }
            Some(_) => false,
        }
    }

    async fn join(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        display_name: DisplayName,
        joined_at: Timestamp,
    ) -> Result<Member, RepositoryError> {
        let mut table = self.table.lock().await;

        if let Some(joined) = table.memberships.get(&connection_id) {
            return Err(RepositoryError::AlreadyJoined(joined.as_str().to_string()));
        }

        let room = table
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;

        let member = Member::new(connection_id.clone(), display_name, joined_at);
        room.admit(member.clone()).map_err(|e| match e {
            RoomError::AlreadyJoined => RepositoryError::AlreadyJoined(room_id.as_str().to_string()),
            RoomError::RoomFull(_) => RepositoryError::RoomFull(room_id.as_str().to_string()),
        })?;

        table.memberships.insert(connection_id, room_id.clone());
        Ok(member)
    }

    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member> {
        let mut table = self.table.lock().await;

        let removed = table
            .rooms
            .get_mut(room_id)
            .and_then(|room| room.remove(connection_id))?;

        table.memberships.remove(connection_id);
        Some(removed)
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<Member> {
        let table = self.table.lock().await;
        table
            .rooms
            .get(room_id)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    async fn count(&self, room_id: &RoomId) -> usize {
        let table = self.table.lock().await;
        table
            .rooms
            .get(room_id)
            .map(Room::member_count)
            .unwrap_or(0)
    }

    async fn member_of(&self, connection_id: &ConnectionId) -> Option<(RoomId, Member)> {
        let table = self.table.lock().await;
        let room_id = table.memberships.get(connection_id)?;
        let member = table.rooms.get(room_id)?.member(connection_id)?.clone();
        Some((room_id.clone(), member))
    }

    async fn stamp_message(
        &self,
        room_id: &RoomId,
        now: Timestamp,
    ) -> Result<Timestamp, RepositoryError> {
        let mut table = self.table.lock().await;
        let room = table
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        Ok(room.stamp_message(now))
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let table = self.table.lock().await;
        table.rooms.get(room_id).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let table = self.table.lock().await;
        table.rooms.values().cloned().collect()
    }
}
