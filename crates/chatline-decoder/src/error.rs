use chatline_wire::WireError;

/// Errors surfaced by the async [`StreamingDecoder`](crate::StreamingDecoder).
///
/// The synchronous [`StreamDecoder`](crate::StreamDecoder) never fails:
/// malformed records are skipped and server failures arrive as events.
/// The async adapter additionally owns the transport, so it reports the
/// conditions a caller has to turn into an error state.
///
/// ```text
///   DecodeError
///   ├── Truncated        ← transport closed before done / error
///   ├── Wire(WireError)  ← a line exceeded the length cap
///   └── Io(io::Error)    ← the underlying reader failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The transport reached end of stream without a terminal record.
    #[error("stream ended before the response was complete")]
    Truncated,

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
