use chatline_decoder::DecodeError;
use chatline_types::TypeError;

use crate::session::SessionError;

/// Errors returned by [`ChatClient`](crate::ChatClient) and
/// [`Conversation`](crate::Conversation).
///
/// ```text
///   ClientError
///   ├── InvalidMessage(TypeError)   ← empty or over-long input, nothing sent
///   ├── Session(SessionError)       ← submit while a reply is pending
///   ├── Http(reqwest::Error)        ← connect, timeout, or body read failure
///   ├── Status { status, body }     ← non-2xx response without an error field
///   ├── Server(String)              ← server-reported `error`
///   ├── InvalidReply(serde_json)    ← plain reply body is not JSON
///   └── Decode(DecodeError)         ← truncated stream or over-long line
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] TypeError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Server(String),

    #[error("invalid reply body: {0}")]
    InvalidReply(#[source] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
