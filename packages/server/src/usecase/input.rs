//! 受信メッセージのフィールドを値オブジェクトに変換するヘルパー

use crate::domain::ValueObjectError;

use super::error::InputError;

/// 必須フィールド。欠落・空文字列は `Missing`
pub(crate) fn required<T>(value: Option<String>, field: &'static str) -> Result<T, InputError>
where
    T: TryFrom<String, Error = ValueObjectError>,
{
    match value {
        Some(value) if !value.is_empty() => Ok(T::try_from(value)?),
        _ => Err(InputError::Missing(field)),
    }
}

/// 任意フィールド。欠落・空文字列は `None`
pub(crate) fn optional<T>(value: Option<String>) -> Result<Option<T>, InputError>
where
    T: TryFrom<String, Error = ValueObjectError>,
{
    match value {
        Some(value) if !value.is_empty() => Ok(Some(T::try_from(value)?)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, RoomId, UserId};

    #[test]
    fn test_required_treats_empty_string_as_missing() {
        // テスト項目: 必須フィールドの空文字列は欠落として扱われる
        // given (前提条件):
        let value = Some(String::new());

        // when (操作):
        let result = required::<RoomId>(value, "room");

        // then (期待する結果):
        assert_eq!(result, Err(InputError::Missing("room")));
    }

    #[test]
    fn test_optional_treats_empty_string_as_absent() {
        // テスト項目: 任意フィールドの空文字列は未指定として扱われる
        // given (前提条件):
        let value = Some(String::new());

        // when (操作):
        let result = optional::<UserId>(value);

        // then (期待する結果):
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_optional_reports_invalid_value() {
        // テスト項目: 任意フィールドでも値が不正ならエラーになる
        // given (前提条件):
        let value = Some("   ".to_string());

        // when (操作):
        let result = optional::<DisplayName>(value);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(InputError::Invalid(ValueObjectError::Empty("username")))
        );
    }
}
