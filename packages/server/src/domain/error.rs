//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 必須の値が空
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// 値が長すぎる
    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
}

/// Room Registry 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Room が存在しない
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// 参加者が Room に存在しない
    #[error("Participant '{user}' not found in room '{room}'")]
    ParticipantNotFound { room: String, user: String },

    /// 同じ userId が既に別の接続で参加している（reject ポリシー時）
    #[error("Participant '{user}' is already connected to room '{room}'")]
    DuplicateParticipant { room: String, user: String },
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先の接続が登録されていない
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    /// チャンネルへの送信に失敗
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// メッセージのシリアライズに失敗
    #[error("Failed to serialize message: {0}")]
    Serialization(String),
}
