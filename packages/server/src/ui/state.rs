//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::RoomId,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase,
    },
};

use super::router::MessageRouter;

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 受信フレームの振り分け
    pub router: Arc<MessageRouter>,
    /// `?room=` 省略時の接続先
    pub default_room: RoomId,
    /// 接続ごとの送信バッファ（フレーム数）
    pub outbound_buffer: usize,
}
