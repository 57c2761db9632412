//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者の参加状態と本文の検証、サーバー側での id・時刻・表示名の付与
//!
//! ### なぜこのテストが必要か
//! - 未参加の接続がメッセージを発信できないことを保証
//! - 送信者自身を含む全メンバーに配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：未参加、空の本文、長すぎる本文

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatError, ChatMessage, ConnectionId, ConnectionRegistry, MessageId, MessageText,
    Notification, RoomId, RoomRepository, Timestamp,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先のルーム
    /// * `connection_id` - 送信者の接続
    /// * `text` - メッセージ本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 受理されたメッセージ（送信者を含む全メンバーに配信済み）
    /// * `Err(ChatError::NotJoined | EmptyMessage | MessageTooLong)` - 拒否（配信なし）
    pub async fn execute(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        text: String,
    ) -> Result<ChatMessage, ChatError> {
        // 1. 送信者がこのルームのメンバーであることを確認
        let sender = match self.repository.member_of(connection_id).await {
            Some((joined_room, member)) if &joined_room == room_id => member,
            _ => return Err(ChatError::NotJoined),
        };

        // 2. 本文の検証
        let text = MessageText::new(text)?;

        // 3. サーバー側で id と時刻を付与
        let sent_at = self
            .repository
            .stamp_message(room_id, Timestamp::new(self.clock.now_millis()))
            .await?;
        let message = ChatMessage {
            id: MessageId::generate(),
            room_id: room_id.clone(),
            sender: sender.connection_id,
            sender_name: sender.display_name,
            text,
            sent_at,
        };

        // 4. 送信者を含む全メンバーにブロードキャスト
        let targets: Vec<ConnectionId> = self
            .repository
            .members_of(room_id)
            .await
            .into_iter()
            .map(|m| m.connection_id)
            .collect();
        let delivered = self
            .registry
            .broadcast(&targets, &Notification::Message(message.clone()))
            .await;

        tracing::info!(
            "Message '{}' from '{}' in room '{}' delivered to {}/{}",
            message.id.as_str(),
            message.sender_name.as_str(),
            room_id,
            delivered,
            targets.len()
        );

        Ok(message)
    }
}
