use chatline_types::{Record, StreamEvent};
use chatline_wire::{
    DEFAULT_MAX_LINE_LEN, LineSplitter, Utf8Accumulator, WireError, check_line_len, data_payload,
};
use tracing::{debug, trace, warn};

/// How a stream ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// A `done` record arrived.
    Done,

    /// An `error` record arrived.
    Failure { message: String },

    /// A line grew past the configured cap. `len` is the length observed
    /// when the cap was hit, which depends on how the input was chunked.
    LineTooLong { len: usize, limit: usize },
}

/// A `data:` line that was skipped because its payload is not valid JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based index of the line among all complete lines seen.
    pub line: usize,
    pub reason: String,
}

/// Incremental decoder for a newline-delimited `data:` record stream.
///
/// The decoder is fed raw transport chunks in arrival order and returns
/// the events each chunk completes. It holds no reference to the transport
/// or to any rendering surface, so a caller can drive it from a reqwest
/// body, a tokio reader, or a byte slice in a test.
///
/// ```text
///   bytes ──▶ Utf8Accumulator ──▶ LineSplitter ──▶ data: prefix ──▶ JSON ──▶ Record
///             (split chars)       (pending tail)   (others skipped)  (bad = diagnostic)
///                                                                          │
///                                               Vec<StreamEvent> ◀─────────┘
/// ```
///
/// Once a terminal event has been returned, further input is ignored.
///
/// # Example
///
/// ```rust
/// use chatline_decoder::StreamDecoder;
/// use chatline_types::StreamEvent;
///
/// let mut decoder = StreamDecoder::new();
/// assert!(decoder.feed(b"data: {\"chunk\": \"par").is_empty());
/// assert_eq!(decoder.feed(b"tial\"}\n"), vec![StreamEvent::chunk("partial")]);
/// assert_eq!(decoder.feed(b"data: {\"done\": true}\n"), vec![StreamEvent::Done]);
/// ```
#[derive(Debug)]
pub struct StreamDecoder {
    utf8: Utf8Accumulator,
    lines: LineSplitter,
    max_line_len: Option<usize>,
    termination: Option<Termination>,
    diagnostics: Vec<Diagnostic>,
    lines_seen: usize,
    closed: bool,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    /// Create a decoder with the default line cap of
    /// [`DEFAULT_MAX_LINE_LEN`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            utf8: Utf8Accumulator::new(),
            lines: LineSplitter::new(),
            max_line_len: Some(DEFAULT_MAX_LINE_LEN),
            termination: None,
            diagnostics: Vec::new(),
            lines_seen: 0,
            closed: false,
        }
    }

    /// Replace the line cap. `None` lets a line grow without bound.
    #[must_use]
    pub fn with_max_line_len(mut self, limit: Option<usize>) -> Self {
        self.max_line_len = limit;
        self
    }

    /// Feed one transport chunk and return the events it completes.
    ///
    /// An empty chunk is accepted and produces nothing. After a terminal
    /// event, or after [`finalize`](Self::finalize), input is ignored.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.closed || self.is_finished() {
            return events;
        }

        let text = self.utf8.push(bytes);
        for line in self.lines.push(&text) {
            self.lines_seen += 1;
            if let Err(WireError::LineTooLong { len, limit }) =
                check_line_len(line.len(), self.max_line_len)
            {
                self.overflow(len, limit, &mut events);
                return events;
            }
            self.process_line(&line, &mut events);
            if self.is_finished() {
                self.lines.take_pending();
                return events;
            }
        }

        if let Err(WireError::LineTooLong { len, limit }) =
            check_line_len(self.lines.pending().len(), self.max_line_len)
        {
            self.overflow(len, limit, &mut events);
        }
        events
    }

    /// Signal end of stream.
    ///
    /// An unterminated final line is discarded even if it looks like a
    /// complete record; only newline-terminated lines count. No terminal
    /// event is synthesized, so a stream that never sent `done` or `error`
    /// leaves [`termination`](Self::termination) as `None`.
    pub fn finalize(&mut self) -> Vec<StreamEvent> {
        if self.closed {
            return Vec::new();
        }
        self.closed = true;

        self.utf8.finish();
        let residual = self.lines.take_pending();
        if !residual.is_empty() {
            debug!(bytes = residual.len(), "discarding unterminated line at end of stream");
        }
        if self.termination.is_none() {
            debug!(lines = self.lines_seen, "stream ended without a terminal record");
        }
        Vec::new()
    }

    /// `true` once `Done` or `Failure` has been returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.termination.is_some()
    }

    /// How the stream ended, if it has.
    #[must_use]
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// Malformed records skipped so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        let Some(payload) = data_payload(line) else {
            trace!(line = self.lines_seen, "ignoring non-data line");
            return;
        };

        let value: serde_json::Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => {
                warn!(line = self.lines_seen, error = %e, "skipping malformed record");
                self.diagnostics.push(Diagnostic {
                    line: self.lines_seen,
                    reason: e.to_string(),
                });
                return;
            }
        };

        for event in Record::from_json(&value).into_events() {
            match &event {
                StreamEvent::Done => {
                    debug!(line = self.lines_seen, "stream done");
                    self.termination = Some(Termination::Done);
                }
                StreamEvent::Failure { message } => {
                    debug!(line = self.lines_seen, %message, "stream failed");
                    self.termination = Some(Termination::Failure {
                        message: message.clone(),
                    });
                }
                StreamEvent::Chunk { .. } => {}
            }
            events.push(event);
        }
    }

    fn overflow(&mut self, len: usize, limit: usize, events: &mut Vec<StreamEvent>) {
        warn!(len, limit, "line exceeds cap, failing stream");
        self.lines.take_pending();
        self.termination = Some(Termination::LineTooLong { len, limit });
        // The message is independent of `len` so that every chunking of the
        // same input yields the same events.
        events.push(StreamEvent::Failure {
            message: format!("stream line exceeds {limit} bytes"),
        });
    }
}

/// Result of decoding a complete, in-memory stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedStream {
    pub events: Vec<StreamEvent>,
    pub termination: Option<Termination>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodedStream {
    /// Concatenated text of all `Chunk` events.
    #[must_use]
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Chunk { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `true` if the stream ended with `done`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.termination == Some(Termination::Done)
    }
}

/// Decode a whole captured stream in one call.
///
/// Equivalent to one [`StreamDecoder::feed`] followed by
/// [`StreamDecoder::finalize`].
#[must_use]
pub fn decode_all(bytes: &[u8]) -> DecodedStream {
    decode_chunks(StreamDecoder::new(), [bytes])
}

/// Run `decoder` over a stream delivered as a sequence of chunks, then
/// finalize it.
pub fn decode_chunks<'a, I>(mut decoder: StreamDecoder, chunks: I) -> DecodedStream
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(decoder.feed(chunk));
    }
    events.extend(decoder.finalize());

    DecodedStream {
        events,
        termination: decoder.termination().cloned(),
        diagnostics: decoder.take_diagnostics(),
    }
}
