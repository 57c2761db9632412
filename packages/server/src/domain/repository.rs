//! Room State trait 定義
//!
//! ドメイン層が必要とするルーム状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, DisplayName, Member, RepositoryError, Room, RoomId, Timestamp};

/// Room Repository trait (Room State)
///
/// ルーム毎の「接続 → 表示名」の対応を参加順に保持する、プレゼンス情報の正本。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// 全てのメソッドは一つの論理的な瞬間のスナップショットを返すこと。
/// `members_of` と `count` は同じロックの下で計算され、互いに矛盾しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを開く（既に開いている場合は何もしない）
    async fn open_room(&self, room_id: &RoomId, created_at: Timestamp)
    -> Result<(), RepositoryError>;

    /// 接続をメンバーとしてルームの末尾に追加
    ///
    /// 接続が既にいずれかのルームに参加している場合は `AlreadyJoined`
    async fn join(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        display_name: DisplayName,
        joined_at: Timestamp,
    ) -> Result<Member, RepositoryError>;

    /// メンバーのいないルームを閉じる
    ///
    /// ルームが開いていない状態になれば `true`（元々開いていなかった場合を含む）。
    /// メンバーが残っている場合は何もせず `false`。
    async fn close_room(&self, room_id: &RoomId) -> bool;

    /// メンバーを削除（存在しない場合は何もせず `None`）
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Member>;

    /// ルームのメンバー一覧（参加順のスナップショット）
    async fn members_of(&self, room_id: &RoomId) -> Vec<Member>;

    /// ルームのメンバー数
    async fn count(&self, room_id: &RoomId) -> usize;

    /// 接続が参加しているルームとメンバー情報を取得
    async fn member_of(&self, connection_id: &ConnectionId) -> Option<(RoomId, Member)>;

    /// 次に受理するメッセージのタイムスタンプを払い出す（ルーム毎に単調増加）
    async fn stamp_message(
        &self,
        room_id: &RoomId,
        now: Timestamp,
    ) -> Result<Timestamp, RepositoryError>;

    /// Room エンティティを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ての Room エンティティを取得（ルーム ID 順）
    async fn get_rooms(&self) -> Vec<Room>;
}
