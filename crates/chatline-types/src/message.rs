use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Longest message, in characters, that the chat backend accepts.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Reply text used when a successful reply carries no usable text field.
const FALLBACK_REPLY: &str = "Response received";

/// Request body for both the plain and the streaming chat endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body of the plain (non-streaming) chat endpoint.
///
/// Different backend revisions name the reply field differently, so all
/// three known names are accepted. An `error` key signals failure even on
/// a 2xx status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub bot_response: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// The server-reported error, if any and non-empty.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// The reply text: `bot_response`, then `response`, then `message`,
    /// skipping empty values.
    #[must_use]
    pub fn text(&self) -> &str {
        [&self.bot_response, &self.response, &self.message]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.is_empty())
            .unwrap_or(FALLBACK_REPLY)
    }
}

/// Trim `input` and check it against the backend's limits.
///
/// Returns the trimmed message on success.
///
/// # Errors
///
/// - [`TypeError::EmptyMessage`] if nothing but whitespace was entered.
/// - [`TypeError::MessageTooLong`] if the trimmed message has more than
///   [`MAX_MESSAGE_CHARS`] characters.
pub fn validate_message(input: &str) -> Result<&str, TypeError> {
    let message = input.trim();
    if message.is_empty() {
        return Err(TypeError::EmptyMessage);
    }
    let chars = message.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(TypeError::MessageTooLong {
            chars,
            limit: MAX_MESSAGE_CHARS,
        });
    }
    Ok(message)
}

/// How close a draft is to [`MAX_MESSAGE_CHARS`].
///
/// ```text
/// ┌──────────┬───────────────┐
/// │ Level    │ Characters    │
/// ├──────────┼───────────────┤
/// │ Normal   │ 0 ..= 800     │
/// │ Warning  │ 801 ..= 900   │
/// │ Critical │ 901 and above │
/// └──────────┴───────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharLevel {
    Normal,
    Warning,
    Critical,
}

/// Character counter for a draft message, displayed as `count/limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub limit: usize,
}

impl CharCount {
    #[must_use]
    pub fn of(draft: &str) -> Self {
        Self {
            count: draft.chars().count(),
            limit: MAX_MESSAGE_CHARS,
        }
    }

    #[must_use]
    pub fn level(&self) -> CharLevel {
        match self.count {
            0..=800 => CharLevel::Normal,
            801..=900 => CharLevel::Warning,
            _ => CharLevel::Critical,
        }
    }
}

impl std::fmt::Display for CharCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.count, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_message_field() {
        let body = serde_json::to_string(&ChatRequest {
            message: "hola".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"message":"hola"}"#);
    }

    #[test]
    fn reply_prefers_bot_response() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"bot_response":"a","response":"b","message":"c"}"#).unwrap();
        assert_eq!(reply.text(), "a");
    }

    #[test]
    fn reply_skips_empty_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"bot_response":"","response":"b"}"#).unwrap();
        assert_eq!(reply.text(), "b");
    }

    #[test]
    fn reply_falls_back_when_no_text() {
        let reply: ChatReply = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(reply.text(), "Response received");
        assert_eq!(reply.error(), None);
    }

    #[test]
    fn reply_error_ignores_empty_string() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"x","error":""}"#).unwrap();
        assert_eq!(reply.error(), None);

        let reply: ChatReply = serde_json::from_str(r#"{"error":"Empty message"}"#).unwrap();
        assert_eq!(reply.error(), Some("Empty message"));
    }

    #[test]
    fn validate_trims() {
        assert_eq!(validate_message("  hi there \n"), Ok("hi there"));
    }

    #[test]
    fn validate_rejects_blank() {
        assert_eq!(validate_message(" \t\n"), Err(TypeError::EmptyMessage));
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let at_limit = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&at_limit).is_ok());

        let over = "é".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(
            validate_message(&over),
            Err(TypeError::MessageTooLong {
                chars: 1001,
                limit: 1000
            })
        );
    }

    #[test]
    fn char_count_levels() {
        assert_eq!(CharCount::of(&"a".repeat(800)).level(), CharLevel::Normal);
        assert_eq!(CharCount::of(&"a".repeat(801)).level(), CharLevel::Warning);
        assert_eq!(CharCount::of(&"a".repeat(901)).level(), CharLevel::Critical);
        assert_eq!(CharCount::of("héllo").to_string(), "5/1000");
    }
}
