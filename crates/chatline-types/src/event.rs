/// A semantic event decoded from the response stream.
///
/// A stream yields any number of `Chunk` events followed by at most one
/// terminal event:
///
/// ```text
///   Chunk("Hel") Chunk("lo") ... Done
///   Chunk("Hel") ... Failure("model unavailable")
///   Chunk("Hel") ...                       ← truncated, no terminal
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// A fragment of assistant output to append to the transcript.
    Chunk { text: String },

    /// The response is complete.
    Done,

    /// The server reported an error. Nothing follows.
    Failure { message: String },
}

impl StreamEvent {
    /// Shorthand for a `Chunk` event.
    pub fn chunk(text: impl Into<String>) -> Self {
        Self::Chunk { text: text.into() }
    }

    /// Shorthand for a `Failure` event.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// `true` for `Done` and `Failure`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failure { .. })
    }
}
