use chatline_wire::WireError;

/// Errors that can occur while building a response stream.
///
/// ```text
///   EncodeError
///   ├── EmptyStream          ← encode() called with no lines added
///   ├── RecordAfterTerminal  ← a line was added after done() / error()
///   └── Wire(WireError)      ← a raw line contained a newline
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("no lines have been added to the encoder")]
    EmptyStream,

    #[error("line {index} was added after the terminal record")]
    RecordAfterTerminal { index: usize },

    #[error(transparent)]
    Wire(#[from] WireError),
}
