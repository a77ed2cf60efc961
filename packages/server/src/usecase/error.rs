//! UseCase 層のエラー型
//!
//! どのエラーも致命的ではありません。UI 層はエラーごとに
//! `error` イベントを返すか、ログだけ残して破棄するかを決めます。

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// 入力メッセージの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// 必須フィールドがない（空文字列を含む）
    #[error("Missing required field '{0}'")]
    Missing(&'static str),

    /// フィールドの値が不正
    #[error("Invalid field: {0}")]
    Invalid(#[from] ValueObjectError),
}

/// Room 参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// 同じ userId が別の接続で参加中（reject ポリシー時）
    #[error("User '{0}' is already in the room")]
    DuplicateParticipant(String),

    #[error(transparent)]
    Registry(RepositoryError),
}

impl JoinRoomError {
    /// クライアントに返す `error` メッセージ。`None` の場合は通知しない
    pub fn client_message(&self) -> Option<&'static str> {
        match self {
            Self::Input(InputError::Missing(_)) => None,
            Self::Input(InputError::Invalid(_))
            | Self::DuplicateParticipant(_)
            | Self::Registry(_) => {
                Some("Failed to join room")
            }
        }
    }
}

/// Room 退出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// 既に退出済み、または参加していない
    #[error("User is not in the room")]
    NotInRoom,
}

/// シグナリング中継のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelaySignalError {
    #[error(transparent)]
    Input(#[from] InputError),
}

/// 画面共有の開始・停止のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenShareError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// 参加者でないユーザーによる共有開始
    #[error("User is not a participant of the room")]
    NotAParticipant,

    /// 現在の共有者でないユーザーによる共有停止
    #[error("User is not the current screen sharer")]
    NotCurrentSharer,
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,
}
