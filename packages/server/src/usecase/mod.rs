//! UseCase 層
//!
//! 受信メッセージごとの状態遷移と、その結果の通知を担当します。
//! 通知は Registry のロックを解放した後に送信します。

mod connect_client;
mod departure;
mod disconnect_participant;
mod error;
mod get_health;
mod get_rooms;
mod input;
mod join_room;
mod leave_room;
mod relay_signal;
mod screen_share;
#[cfg(test)]
mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use departure::departure_deliveries;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    GetRoomDetailError, InputError, JoinRoomError, LeaveRoomError, RelaySignalError,
    ScreenShareError,
};
pub use get_health::GetHealthUseCase;
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::{JoinOutcome, JoinRoomInput, JoinRoomUseCase};
pub use leave_room::{LeaveRoomInput, LeaveRoomUseCase};
pub use relay_signal::{RelaySignalInput, RelaySignalUseCase, SignalRoute};
pub use screen_share::{
    StartScreenShareInput, StartScreenShareUseCase, StopScreenShareInput, StopScreenShareUseCase,
};
