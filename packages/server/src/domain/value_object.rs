//! Value objects of the chat domain.
//!
//! Every raw string coming from a client is turned into one of these types
//! before it reaches Room State, so an invalid name or message body can never
//! be stored or broadcast.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum display name length (characters)
pub const DISPLAY_NAME_MAX_CHARS: usize = 20;
/// Maximum chat message length (characters)
pub const MESSAGE_TEXT_MAX_CHARS: usize = 500;
/// Maximum room identifier length (characters)
pub const ROOM_ID_MAX_CHARS: usize = 64;

/// Identifier of a live transport connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh random connection id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room identifier, e.g. `anonymous-chat`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let valid_len = (1..=ROOM_ID_MAX_CHARS).contains(&value.chars().count());
        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_len || !valid_chars {
            return Err(ValueObjectError::InvalidRoomId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Self-asserted display name of a member (1-20 printable characters)
///
/// Surrounding whitespace is trimmed before validation. Names are not
/// required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        if len > DISPLAY_NAME_MAX_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong {
                len,
                max: DISPLAY_NAME_MAX_CHARS,
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValueObjectError::NonPrintableDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Body of a chat message (1-500 characters after trimming)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(ValueObjectError::EmptyMessageText);
        }
        if len > MESSAGE_TEXT_MAX_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                len,
                max: MESSAGE_TEXT_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Server-assigned chat message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
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

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_within_bound_is_accepted() {
        // テスト項目: 20 文字以内の表示名が受け入れられる
        // given (前提条件):
        let raw = "Shadow Voice42".to_string();

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "Shadow Voice42");
    }

    #[test]
    fn test_display_name_exactly_at_bound_is_accepted() {
        // テスト項目: ちょうど 20 文字の表示名が受け入れられる
        // given (前提条件):
        let raw = "a".repeat(DISPLAY_NAME_MAX_CHARS);

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_display_name_too_long_is_rejected() {
        // テスト項目: 21 文字の表示名は拒否される
        // given (前提条件):
        let raw = "a".repeat(21);

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::DisplayNameTooLong { len: 21, max: 20 })
        );
    }

    #[test]
    fn test_display_name_counts_characters_not_bytes() {
        // テスト項目: 表示名の長さはバイト数ではなく文字数で判定される
        // given (前提条件):
        let raw = "ひろば".repeat(6); // 18 chars, 54 bytes

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_display_name_is_trimmed_and_blank_rejected() {
        // テスト項目: 前後の空白は除去され、空白のみの名前は拒否される
        // given (前提条件):
        let padded = "  Ann  ".to_string();
        let blank = "   ".to_string();

        // when (操作):
        let padded_result = DisplayName::new(padded);
        let blank_result = DisplayName::new(blank);

        // then (期待する結果):
        assert_eq!(padded_result.unwrap().as_str(), "Ann");
        assert_eq!(blank_result, Err(ValueObjectError::EmptyDisplayName));
    }

    #[test]
    fn test_display_name_with_control_character_is_rejected() {
        // テスト項目: 制御文字を含む表示名は拒否される
        // given (前提条件):
        let raw = "An\u{7}n".to_string();

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::NonPrintableDisplayName));
    }

    #[test]
    fn test_message_text_bounds() {
        // テスト項目: メッセージ本文は 1〜500 文字のみ受け入れられる
        // given (前提条件):
        let at_bound = "x".repeat(MESSAGE_TEXT_MAX_CHARS);
        let over_bound = "x".repeat(MESSAGE_TEXT_MAX_CHARS + 1);

        // when (操作):
        let ok = MessageText::new(at_bound);
        let too_long = MessageText::new(over_bound);
        let empty = MessageText::new(" \n ".to_string());

        // then (期待する結果):
        assert!(ok.is_ok());
        assert_eq!(
            too_long,
            Err(ValueObjectError::MessageTextTooLong { len: 501, max: 500 })
        );
        assert_eq!(empty, Err(ValueObjectError::EmptyMessageText));
    }

    #[test]
    fn test_room_id_validation() {
        // テスト項目: ルーム ID は英数字・ハイフン・アンダースコアのみ許可される
        // given (前提条件):
        let valid = "anonymous-chat".to_string();
        let with_slash = "a/b".to_string();
        let empty = String::new();

        // when (操作):
        let valid_result = RoomId::new(valid);
        let slash_result = RoomId::new(with_slash);
        let empty_result = RoomId::new(empty);

        // then (期待する結果):
        assert_eq!(valid_result.unwrap().as_str(), "anonymous-chat");
        assert!(slash_result.is_err());
        assert!(empty_result.is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        // テスト項目: 生成される ID は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let m1 = MessageId::generate();
        let m2 = MessageId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert_ne!(m1, m2);
    }
}
