//! Connection Registry trait 定義
//!
//! 接続中のクライアントの識別情報と送信チャンネルを管理するインターフェース。
//! WebSocket の生成は UI 層で行われ、Registry は生成された送信チャンネルを受け取って
//! メッセージ送信に使用します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Connection, ConnectionId, DisplayName, Notification, RoomId, Timestamp, TransportError};

/// Outbound frame channel of a single connection (bounded)
pub type OutboundSender = mpsc::Sender<String>;

/// Connection Registry trait
///
/// - `unregister` は冪等（エラーハンドラとクローズハンドラの両方から呼ばれても安全）
/// - `push_to` / `broadcast` はベストエフォート。送信先が閉じていてもパニックしない
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録し、新しい ConnectionId を払い出す
    async fn register(
        &self,
        room_id: RoomId,
        connected_at: Timestamp,
        sender: OutboundSender,
    ) -> ConnectionId;

    /// 接続の登録を解除（既に解除済みなら `None`）
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 接続情報を取得
    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// join 後の表示名を接続に紐付ける
    async fn bind_display_name(&self, connection_id: &ConnectionId, display_name: DisplayName);

    /// 特定の接続に通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), TransportError>;

    /// 複数の接続に通知を送信し、送信できた件数を返す
    ///
    /// 一部の送信失敗はログに記録してスキップする。
    async fn broadcast(&self, targets: &[ConnectionId], notification: &Notification) -> usize;

    /// 登録中の接続数
    async fn count(&self) -> usize;
}
