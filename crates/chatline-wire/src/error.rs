/// Errors raised by the line framing layer.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A single line (complete or still pending) grew past the configured cap.
    #[error("line of {len} bytes exceeds limit of {limit} bytes")]
    LineTooLong { len: usize, limit: usize },

    /// A payload handed to the writer contained a newline, which would
    /// split it into two lines on the wire.
    #[error("payload contains a newline at byte {offset}")]
    EmbeddedNewline { offset: usize },
}
