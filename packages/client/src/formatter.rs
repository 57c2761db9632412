//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::UserInfo;
use hiroba_shared::time::timestamp_to_local_hhmm;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the member roster
    ///
    /// # Arguments
    ///
    /// * `users` - Members in join order
    /// * `current_username` - Own username (to mark as "me")
    pub fn format_user_list(users: &[UserInfo], current_username: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Members ({}):\n", users.len()));

        if users.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for user in users {
                let me_suffix = if user.username == current_username {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("  {}{}\n", user.username, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message as `[HH:MM] name: text`
    pub fn format_chat_message(username: &str, text: &str, sent_at: i64, is_me: bool) -> String {
        let me_suffix = if is_me { " (me)" } else { "" };
        format!(
            "\n[{}] {}{}: {}\n",
            timestamp_to_local_hhmm(sent_at),
            username,
            me_suffix,
            text
        )
    }

    /// Format a private rejection notice
    pub fn format_error(code: &str, message: &str) -> String {
        format!("\n! {} ({})\n", message, code)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }
}
