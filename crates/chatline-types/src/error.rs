/// Errors from validating outbound chat messages.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The message was empty after trimming whitespace.
    #[error("message is empty")]
    EmptyMessage,

    /// The message is longer than the backend accepts.
    #[error("message is too long ({chars} characters, limit {limit})")]
    MessageTooLong { chars: usize, limit: usize },
}
