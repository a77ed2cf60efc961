//! 値オブジェクト
//!
//! Room / 参加者 / 接続を識別する値と、表示名・タイムスタンプを定義します。
//! 生成時にバリデーションを行い、不正な値はドメインに入りません。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// RoomId / UserId の最大文字数
pub const MAX_ID_LENGTH: usize = 128;

/// DisplayName の最大文字数
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

fn validate(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(ValueObjectError::TooLong { field, max });
    }
    Ok(())
}

/// Room の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate(&value, "room", MAX_ID_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者の識別子（Room 内で一意）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate(&value, "userId", MAX_ID_LENGTH)?;
        Ok(Self(value))
    }

    /// クライアントが userId を指定しなかった場合の ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者の表示名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// 前後の空白を取り除いてから検証する
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        validate(trimmed, "username", MAX_DISPLAY_NAME_LENGTH)?;
        Ok(Self(trimmed.to_string()))
    }

    /// 表示名が指定されなかった場合のデフォルト（`User_` + userId の先頭 8 文字）
    pub fn default_for(user_id: &UserId) -> Self {
        let prefix: String = user_id.as_str().chars().take(8).collect();
        Self(format!("User_{}", prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// トランスポート接続（WebSocket セッション）の識別子
///
/// サーバー側で採番する不透明な値で、バリデーションは行わない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_rejects_empty_value() {
        // テスト項目: 空文字列の RoomId は生成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("room")));
    }

    #[test]
    fn test_user_id_rejects_too_long_value() {
        // テスト項目: 最大文字数を超える UserId は生成できない
        // given (前提条件):
        let value = "u".repeat(MAX_ID_LENGTH + 1);

        // when (操作):
        let result = UserId::new(value);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooLong {
                field: "userId",
                max: MAX_ID_LENGTH
            })
        );
    }

    #[test]
    fn test_user_id_accepts_max_length_value() {
        // テスト項目: 最大文字数ちょうどの UserId は生成できる
        // given (前提条件):
        let value = "u".repeat(MAX_ID_LENGTH);

        // when (操作):
        let result = UserId::new(value.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), value);
    }

    #[test]
    fn test_generated_user_ids_are_unique() {
        // テスト項目: 自動生成された UserId は毎回異なる
        // given (前提条件):

        // when (操作):
        let first = UserId::generate();
        let second = UserId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_display_name_is_trimmed() {
        // テスト項目: 表示名の前後の空白が取り除かれる
        // given (前提条件):
        let value = "  Alice  ".to_string();

        // when (操作):
        let name = DisplayName::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_display_name_rejects_whitespace_only() {
        // テスト項目: 空白のみの表示名は生成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = DisplayName::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("username")));
    }

    #[test]
    fn test_default_display_name_uses_user_id_prefix() {
        // テスト項目: デフォルトの表示名は userId の先頭 8 文字から作られる
        // given (前提条件):
        let user_id = UserId::new("0123456789abcdef".to_string()).unwrap();
        let short_id = UserId::new("bob".to_string()).unwrap();

        // when (操作):
        let name = DisplayName::default_for(&user_id);
        let short_name = DisplayName::default_for(&short_id);

        // then (期待する結果):
        assert_eq!(name.as_str(), "User_01234567");
        assert_eq!(short_name.as_str(), "User_bob");
    }
}
