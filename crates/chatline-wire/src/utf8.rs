use std::char::REPLACEMENT_CHARACTER;

/// Incremental UTF-8 decoder for chunked transports.
///
/// A transport read may end in the middle of a multi-byte character. The
/// accumulator holds back the unfinished tail (at most 3 bytes) and joins
/// it with the next chunk, so characters are never split or dropped.
/// Byte sequences that can never become valid UTF-8 are replaced with
/// U+FFFD, the same way [`String::from_utf8_lossy`] would for the whole
/// input.
///
/// ```text
///   push([0x48, 0xE2, 0x82])  ──▶ "H"        pending = [E2 82]
///   push([0xAC, 0x21])        ──▶ "€!"       pending = []
///   finish()                  ──▶ ""
/// ```
#[derive(Clone, Debug, Default)]
pub struct Utf8Accumulator {
    pending: Vec<u8>,
}

impl Utf8Accumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, prefixed by any tail held back from the previous
    /// call, and return the text that is complete so far.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len() + self.pending.len());
        if self.pending.is_empty() {
            self.decode_into(bytes, &mut out);
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(bytes);
            self.decode_into(&joined, &mut out);
        }
        out
    }

    /// Flush the decoder at end of stream.
    ///
    /// An unfinished multi-byte sequence left in the tail becomes a single
    /// U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Number of bytes held back waiting for the rest of a character.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn decode_into(&mut self, input: &[u8], out: &mut String) {
        let mut rest = input;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&rest[..valid]) {
                        out.push_str(text);
                    }
                    match e.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &rest[valid + bad..];
                        }
                        // Input ended inside a character that may still complete.
                        None => {
                            self.pending.extend_from_slice(&rest[valid..]);
                            return;
                        }
                    }
                }
            }
        }
    }
}
