//! Entities of the chat domain.

use super::{
    error::{ChatError, RoomError},
    value_object::{ConnectionId, DisplayName, MessageId, MessageText, RoomId, Timestamp},
};

/// Default member capacity of a room
pub const DEFAULT_ROOM_CAPACITY: usize = 256;

/// Registry view of a live connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Room this connection targets (fixed at connect time)
    pub room_id: RoomId,
    /// Back-reference to the member name, set once the connection joined
    pub display_name: Option<DisplayName>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, room_id: RoomId, connected_at: Timestamp) -> Self {
        Self {
            id,
            room_id,
            display_name: None,
            connected_at,
        }
    }

    pub fn has_joined(&self) -> bool {
        self.display_name.is_some()
    }
}

/// Joined-state projection of a connection inside a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
        }
    }
}

/// Chat room: a join-ordered set of members sharing one broadcast domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    /// Members in join order (drives roster display order)
    pub members: Vec<Member>,
    pub capacity: usize,
    pub message_count: u64,
    pub last_message_at: Option<Timestamp>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_ROOM_CAPACITY)
    }

    pub fn with_capacity(id: RoomId, created_at: Timestamp, capacity: usize) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            capacity,
            message_count: 0,
            last_message_at: None,
        }
    }

    /// Append a member at the tail of the roster
    pub fn admit(&mut self, member: Member) -> Result<(), RoomError> {
        if self.contains(&member.connection_id) {
            return Err(RoomError::AlreadyJoined);
        }
        if self.members.len() >= self.capacity {
            return Err(RoomError::RoomFull(self.capacity));
        }
        self.members.push(member);
        Ok(())
    }

    /// Remove a member, returning it when it was present
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }

    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| &m.connection_id == connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.member(connection_id).is_some()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Assign the timestamp of the next accepted message.
    ///
    /// Timestamps are strictly increasing within a room even when the clock
    /// stalls or steps backwards.
    pub fn stamp_message(&mut self, now: Timestamp) -> Timestamp {
        let stamped = match self.last_message_at {
            Some(last) if now <= last => Timestamp::new(last.value() + 1),
            _ => now,
        };
        self.last_message_at = Some(stamped);
        self.message_count += 1;
        stamped
    }
}

/// Chat message accepted by the coordinator (transient, never persisted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender: ConnectionId,
    pub sender_name: DisplayName,
    pub text: MessageText,
    pub sent_at: Timestamp,
}

/// Outbound event pushed to connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Message(ChatMessage),
    UserCount(usize),
    UserList(Vec<Member>),
    Error(ChatError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room::with_capacity(
            RoomId::new("lobby".to_string()).unwrap(),
            Timestamp::new(0),
            2,
        )
    }

    fn member(id: &str, name: &str) -> Member {
        Member::new(
            ConnectionId::new(id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_admit_keeps_join_order() {
        // テスト項目: メンバーは参加順に並ぶ
        // given (前提条件):
        let mut room = room();

        // when (操作):
        room.admit(member("c2", "Bob")).unwrap();
        room.admit(member("c1", "Ann")).unwrap();

        // then (期待する結果):
        let names: Vec<&str> = room.members.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
    }

    #[test]
    fn test_admit_rejects_duplicate_connection() {
        // テスト項目: 同じ接続が二重に参加することはできない
        // given (前提条件):
        let mut room = room();
        room.admit(member("c1", "Ann")).unwrap();

        // when (操作):
        let result = room.admit(member("c1", "Ann again"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::AlreadyJoined));
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn test_admit_allows_duplicate_names() {
        // テスト項目: 異なる接続であれば同じ表示名で参加できる
        // given (前提条件):
        let mut room = room();
        room.admit(member("c1", "Ann")).unwrap();

        // when (操作):
        let result = room.admit(member("c2", "Ann"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(room.member_count(), 2);
    }

    #[test]
    fn test_admit_rejects_when_full() {
        // テスト項目: 容量を超える参加は拒否される
        // given (前提条件):
        let mut room = room();
        room.admit(member("c1", "Ann")).unwrap();
        room.admit(member("c2", "Bob")).unwrap();

        // when (操作):
        let result = room.admit(member("c3", "Cy"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomFull(2)));
    }

    #[test]
    fn test_remove_is_noop_for_absent_member() {
        // テスト項目: 存在しないメンバーの削除は何もしない
        // given (前提条件):
        let mut room = room();
        room.admit(member("c1", "Ann")).unwrap();

        // when (操作):
        let first = room.remove(&ConnectionId::new("c1".to_string()).unwrap());
        let second = room.remove(&ConnectionId::new("c1".to_string()).unwrap());

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(room.member_count(), 0);
    }

    #[test]
    fn test_stamp_message_is_strictly_increasing() {
        // テスト項目: 時計が止まっても戻っても、メッセージのタイムスタンプは単調増加する
        // given (前提条件):
        let mut room = room();

        // when (操作):
        let t1 = room.stamp_message(Timestamp::new(5000));
        let t2 = room.stamp_message(Timestamp::new(5000));
        let t3 = room.stamp_message(Timestamp::new(4000));
        let t4 = room.stamp_message(Timestamp::new(9000));

        // then (期待する結果):
        assert_eq!(t1.value(), 5000);
        assert_eq!(t2.value(), 5001);
        assert_eq!(t3.value(), 5002);
        assert_eq!(t4.value(), 9000);
        assert_eq!(room.message_count, 4);
    }
}
