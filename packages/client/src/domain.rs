//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use hiroba_server::domain::{DISPLAY_NAME_MAX_CHARS, MESSAGE_TEXT_MAX_CHARS};
use rand::Rng;

use crate::error::ClientError;

const NAME_ADJECTIVES: [&str; 8] = [
    "Anonymous", "Mystery", "Secret", "Hidden", "Silent", "Quiet", "Phantom", "Shadow",
];

const NAME_NOUNS: [&str; 8] = [
    "User", "Person", "Guest", "Visitor", "Stranger", "Friend", "Chatter", "Voice",
];

/// Check if the client should exit immediately based on the error type.
///
/// Rejected upgrades and invalid usernames fail the same way on every retry.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::UpgradeRejected(_) | ClientError::InvalidUsername(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Validate a username with the server's display-name bounds
pub fn validate_username(username: &str) -> Result<String, ClientError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUsername(
            "username must not be empty".to_string(),
        ));
    }
    let len = trimmed.chars().count();
    if len > DISPLAY_NAME_MAX_CHARS {
        return Err(ClientError::InvalidUsername(format!(
            "username is {} characters, at most {} allowed",
            len, DISPLAY_NAME_MAX_CHARS
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ClientError::InvalidUsername(
            "username must not contain control characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Generate an anonymous username such as `SilentVisitor42`
///
/// Adjective + noun + a number in `0..1000`. The longest combination is
/// exactly [`DISPLAY_NAME_MAX_CHARS`] characters.
pub fn generate_username<R: Rng>(rng: &mut R) -> String {
    let adjective = NAME_ADJECTIVES[rng.random_range(0..NAME_ADJECTIVES.len())];
    let noun = NAME_NOUNS[rng.random_range(0..NAME_NOUNS.len())];
    let number: u16 = rng.random_range(0..1000);
    format!("{}{}{}", adjective, noun, number)
}

/// Whether an input line fits in one chat message
pub fn is_sendable(text: &str) -> bool {
    let len = text.trim().chars().count();
    len > 0 && len <= MESSAGE_TEXT_MAX_CHARS
}

/// Build the partysocket-style room URL from a server base URL
///
/// `ws://host:8080` + `lobby` → `ws://host:8080/parties/main/lobby`
pub fn room_url(server_url: &str, room: &str) -> String {
    format!("{}/parties/main/{}", server_url.trim_end_matches('/'), room)
}

/// Extract the HTTP status of a rejected upgrade
pub fn rejected_status(error: &tokio_tungstenite::tungstenite::Error) -> Option<u16> {
    match error {
        tokio_tungstenite::tungstenite::Error::Http(response) => {
            Some(response.status().as_u16())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_with_rejected_upgrade() {
        // テスト項目: アップグレード拒否の場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::UpgradeRejected(503);

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_rejected_upgrade() {
        // テスト項目: アップグレード拒否の場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::UpgradeRejected(400);

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_validate_username() {
        // テスト項目: ユーザー名はサーバーと同じ基準で検証される
        // given (前提条件):
        let accepted = "  Shadow Voice42 ";
        let too_long = "a".repeat(21);

        // when (操作):
        let ok = validate_username(accepted);
        let err = validate_username(&too_long);
        let empty = validate_username("   ");

        // then (期待する結果):
        assert_eq!(ok.unwrap(), "Shadow Voice42");
        assert!(matches!(err, Err(ClientError::InvalidUsername(_))));
        assert!(matches!(empty, Err(ClientError::InvalidUsername(_))));
    }

    #[test]
    fn test_is_sendable() {
        // テスト項目: 1〜500 文字のメッセージだけ送信できる
        // given (前提条件):
        let max = "x".repeat(500);
        let over = "x".repeat(501);

        // when (操作):

        // then (期待する結果):
        assert!(is_sendable("hi"));
        assert!(is_sendable(&max));
        assert!(!is_sendable(&over));
        assert!(!is_sendable("   "));
    }

    #[test]
    fn test_room_url() {
        // テスト項目: サーバー URL とルーム名から接続先 URL を組み立てる
        // given (前提条件):
        let server_url = "ws://127.0.0.1:8080/";

        // when (操作):
        let url = room_url(server_url, "lobby");

        // then (期待する結果):
        assert_eq!(url, "ws://127.0.0.1:8080/parties/main/lobby");
    }

    #[test]
    fn test_generated_usernames_are_valid() {
        // テスト項目: 自動生成したユーザー名は常に検証を通り、形容詞 + 名詞 + 数字の形になる
        // given (前提条件):
        use rand::{SeedableRng, rngs::StdRng};
        let mut rng = StdRng::seed_from_u64(7);

        // when (操作):
        let names: Vec<String> = (0..200).map(|_| generate_username(&mut rng)).collect();

        // then (期待する結果):
        for name in &names {
            assert_eq!(validate_username(name).unwrap(), *name);
            assert!(NAME_ADJECTIVES.iter().any(|a| name.starts_with(a)));
            let digits = name.trim_start_matches(|c: char| !c.is_ascii_digit());
            assert!(!digits.is_empty() && digits.len() <= 3);
            assert!(digits.parse::<u16>().unwrap() < 1000);
        }
    }

    #[test]
    fn test_longest_generated_username_fits() {
        // テスト項目: 最も長い組み合わせでも表示名の上限に収まる
        // given (前提条件):
        let longest_adjective = NAME_ADJECTIVES.iter().map(|a| a.len()).max().unwrap();
        let longest_noun = NAME_NOUNS.iter().map(|n| n.len()).max().unwrap();

        // when (操作):
        let longest = longest_adjective + longest_noun + 3;

        // then (期待する結果):
        assert!(longest <= DISPLAY_NAME_MAX_CHARS);
    }
}
