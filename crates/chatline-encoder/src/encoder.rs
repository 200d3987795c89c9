use chatline_types::Record;
use chatline_wire::{WireError, write_data_line};

use crate::error::EncodeError;

/// Builds a `data:`-line response stream, the producer side of
/// `chatline_decoder::StreamDecoder`.
///
/// Methods append lines in order and return `&mut Self` for chaining:
///
/// ```rust
/// use chatline_encoder::StreamEncoder;
///
/// let bytes = StreamEncoder::new()
///     .chunk("Hel")
///     .chunk("lo")
///     .keep_alive()
///     .done()
///     .encode()
///     .unwrap();
///
/// assert_eq!(
///     bytes,
///     b"data: {\"chunk\":\"Hel\"}\ndata: {\"chunk\":\"lo\"}\n\ndata: {\"done\":true}\n"
/// );
/// ```
///
/// # Output layout
///
/// ```text
/// ┌──────────────────────┬──────────────────────────────────┐
/// │ chunk("Hel")         │ data: {"chunk":"Hel"}\n          │
/// │ keep_alive()         │ \n                               │
/// │ comment("ping")      │ : ping\n                         │
/// │ raw_line("anything") │ anything\n                       │
/// │ done()               │ data: {"done":true}\n            │
/// │ error("bad request") │ data: {"error":"bad request"}\n  │
/// └──────────────────────┴──────────────────────────────────┘
/// ```
///
/// `done()` and `error()` are terminal. Adding another record after one
/// makes [`encode`](Self::encode) fail; keep-alives, comments and raw
/// lines may still follow, which is useful for exercising decoders.
#[derive(Clone, Debug, Default)]
pub struct StreamEncoder {
    lines: Vec<PendingLine>,
}

#[derive(Clone, Debug)]
enum PendingLine {
    Record(Record),
    KeepAlive,
    Comment(String),
    Raw(String),
}

impl StreamEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment record.
    pub fn chunk(&mut self, text: impl Into<String>) -> &mut Self {
        self.record(Record {
            chunk: Some(text.into()),
            ..Record::default()
        })
    }

    /// Append every fragment as its own chunk record.
    pub fn chunks<I, S>(&mut self, fragments: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for fragment in fragments {
            self.chunk(fragment);
        }
        self
    }

    /// Append the terminal `{"done":true}` record.
    pub fn done(&mut self) -> &mut Self {
        self.record(Record {
            done: true,
            ..Record::default()
        })
    }

    /// Append a terminal `{"error": message}` record.
    pub fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.record(Record {
            error: Some(message.into()),
            ..Record::default()
        })
    }

    /// Append an arbitrary record.
    pub fn record(&mut self, record: Record) -> &mut Self {
        self.lines.push(PendingLine::Record(record));
        self
    }

    /// Append a blank line.
    pub fn keep_alive(&mut self) -> &mut Self {
        self.lines.push(PendingLine::KeepAlive);
        self
    }

    /// Append a `: text` comment line.
    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(PendingLine::Comment(text.into()));
        self
    }

    /// Append a line verbatim (a newline is added).
    pub fn raw_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(PendingLine::Raw(line.into()));
        self
    }

    /// Serialize all lines into a UTF-8 string.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::EmptyStream`] if no lines were added.
    /// - [`EncodeError::RecordAfterTerminal`] if a record follows `done()`
    ///   or `error()`.
    /// - [`EncodeError::Wire`] if a comment or raw line contains `\n`.
    pub fn encode_string(&self) -> Result<String, EncodeError> {
        if self.lines.is_empty() {
            return Err(EncodeError::EmptyStream);
        }

        let mut out = String::new();
        let mut terminated = false;

        for (index, line) in self.lines.iter().enumerate() {
            match line {
                PendingLine::Record(record) => {
                    if terminated {
                        return Err(EncodeError::RecordAfterTerminal { index });
                    }
                    terminated = record.done || record.error.is_some();
                    write_data_line(&mut out, &record.to_json())?;
                }
                PendingLine::KeepAlive => out.push('\n'),
                PendingLine::Comment(text) => {
                    push_plain_line(&mut out, ": ", text)?;
                }
                PendingLine::Raw(text) => {
                    push_plain_line(&mut out, "", text)?;
                }
            }
        }

        Ok(out)
    }

    /// Serialize all lines into bytes.
    ///
    /// # Errors
    ///
    /// Same as [`encode_string`](Self::encode_string).
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode_string().map(String::into_bytes)
    }
}

fn push_plain_line(out: &mut String, prefix: &str, text: &str) -> Result<(), WireError> {
    if let Some(offset) = text.find('\n') {
        return Err(WireError::EmbeddedNewline { offset });
    }
    out.push_str(prefix);
    out.push_str(text);
    out.push('\n');
    Ok(())
}

/// Split `text` into fragments of `words_per_chunk` words each.
///
/// Whitespace stays attached to the word before it, so concatenating the
/// fragments gives back `text` exactly. A `words_per_chunk` of zero is
/// treated as one.
#[must_use]
pub fn split_words(text: &str, words_per_chunk: usize) -> Vec<String> {
    let per_chunk = words_per_chunk.max(1);
    let words: Vec<&str> = text.split_inclusive(char::is_whitespace).collect();
    words.chunks(per_chunk).map(|group| group.concat()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_decoder::decode_all;
    use chatline_types::StreamEvent;

    #[test]
    fn encodes_chunks_and_done() {
        let out = StreamEncoder::new()
            .chunk("Hi")
            .done()
            .encode_string()
            .unwrap();
        assert_eq!(out, "data: {\"chunk\":\"Hi\"}\ndata: {\"done\":true}\n");
    }

    #[test]
    fn encodes_error() {
        let out = StreamEncoder::new().error("bad request").encode_string().unwrap();
        assert_eq!(out, "data: {\"error\":\"bad request\"}\n");
    }

    #[test]
    fn escapes_newlines_inside_chunks() {
        let out = StreamEncoder::new()
            .chunk("line one\nline two")
            .encode_string()
            .unwrap();
        assert_eq!(out, "data: {\"chunk\":\"line one\\nline two\"}\n");
    }

    #[test]
    fn comment_and_raw_lines() {
        let out = StreamEncoder::new()
            .comment("ping")
            .raw_line("event: message")
            .keep_alive()
            .encode_string()
            .unwrap();
        assert_eq!(out, ": ping\nevent: message\n\n");
    }

    #[test]
    fn empty_encoder_fails() {
        assert!(matches!(
            StreamEncoder::new().encode(),
            Err(EncodeError::EmptyStream)
        ));
    }

    #[test]
    fn record_after_done_fails() {
        let result = StreamEncoder::new().done().chunk("late").encode();
        assert!(matches!(
            result,
            Err(EncodeError::RecordAfterTerminal { index: 1 })
        ));
    }

    #[test]
    fn raw_line_after_done_is_allowed() {
        let out = StreamEncoder::new()
            .done()
            .raw_line(r#"data: {"chunk":"late"}"#)
            .encode_string()
            .unwrap();
        assert!(out.ends_with("data: {\"chunk\":\"late\"}\n"));
    }

    #[test]
    fn raw_line_with_newline_fails() {
        let result = StreamEncoder::new().raw_line("a\nb").encode();
        assert!(matches!(
            result,
            Err(EncodeError::Wire(WireError::EmbeddedNewline { offset: 1 }))
        ));
    }

    #[test]
    fn split_words_preserves_text() {
        let text = "La cirugía de baipás  coronario crea una nueva vía.";
        let parts = split_words(text, 2);
        assert_eq!(parts.concat(), text);
        assert_eq!(parts[0], "La cirugía ");
    }

    #[test]
    fn split_words_zero_means_one() {
        assert_eq!(split_words("a b", 0), vec!["a ", "b"]);
    }

    #[test]
    fn encoded_stream_decodes_back() {
        let fragments = split_words("streamed reply with several words", 2);
        let bytes = StreamEncoder::new()
            .chunks(fragments.clone())
            .done()
            .encode()
            .unwrap();

        let decoded = decode_all(&bytes);
        let mut expected: Vec<StreamEvent> =
            fragments.into_iter().map(StreamEvent::chunk).collect();
        expected.push(StreamEvent::Done);
        assert_eq!(decoded.events, expected);
    }
}
