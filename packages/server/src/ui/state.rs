//! Shared application state.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryConnectionDirectory, InMemoryRoomRegistry},
    },
    usecase::{
        ConnectClientUseCase, DisconnectParticipantUseCase, GetHealthUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RelaySignalUseCase, StartScreenShareUseCase, StopScreenShareUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続受付のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（Room 退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// StartScreenShareUseCase（画面共有開始のユースケース）
    pub start_screen_share_usecase: Arc<StartScreenShareUseCase>,
    /// StopScreenShareUseCase（画面共有停止のユースケース）
    pub stop_screen_share_usecase: Arc<StopScreenShareUseCase>,
    /// DisconnectParticipantUseCase（切断処理のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetHealthUseCase（ヘルスチェックのユースケース）
    pub get_health_usecase: Arc<GetHealthUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Wire the in-memory registry and the WebSocket pusher into every use case
    pub fn in_memory(config: &ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. ConnectionDirectory
        // 2. RoomRegistry
        // 3. MessagePusher
        // 4. UseCases

        // 1. Create ConnectionDirectory (connection id -> room, user)
        let directory = Arc::new(InMemoryConnectionDirectory::new());

        // 2. Create RoomRegistry (in-memory, per-room locking)
        let registry = Arc::new(
            InMemoryRoomRegistry::new(directory.clone())
                .with_policy(config.duplicate_join_policy),
        );

        // 3. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 4. Create UseCases
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                registry.clone(),
                directory.clone(),
                message_pusher.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            start_screen_share_usecase: Arc::new(StartScreenShareUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                config.announce_replaced_sharer,
            )),
            stop_screen_share_usecase: Arc::new(StopScreenShareUseCase::new(
                registry.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                registry.clone(),
                directory,
                message_pusher,
            )),
            get_health_usecase: Arc::new(GetHealthUseCase::new(registry.clone())),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(registry.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(registry)),
        }
    }
}
