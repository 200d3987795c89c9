use crate::error::WireError;

/// Default cap on a single line, in bytes (1 MiB).
///
/// A well-behaved server sends one small JSON record per line. A line that
/// grows past this limit without a newline is treated as a broken stream
/// rather than buffered forever.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024 * 1024;

/// Splits a growing text buffer into newline-terminated lines.
///
/// Text is appended with [`push`](Self::push). Every `\n` closes a line;
/// the segment after the last newline is kept as the pending tail and is
/// completed by a later push. The newline itself is not part of the
/// returned line. A `\r` before the newline is left in place.
///
/// ```text
///   push("a\nb")   ──▶ ["a"]        pending = "b"
///   push("c\n\n")  ──▶ ["bc", ""]   pending = ""
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineSplitter {
    pending: String,
}

impl LineSplitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return every line it completes, in order.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        let Some(last_newline) = text.rfind('\n') else {
            self.pending.push_str(text);
            return Vec::new();
        };

        self.pending.push_str(&text[..last_newline]);
        let complete = std::mem::replace(&mut self.pending, text[last_newline + 1..].to_owned());
        complete.split('\n').map(str::to_owned).collect()
    }

    /// The unterminated tail.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Remove and return the unterminated tail.
    pub fn take_pending(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }
}

/// Check a line length against an optional cap.
///
/// # Errors
///
/// Returns [`WireError::LineTooLong`] when `limit` is set and `len`
/// exceeds it.
pub fn check_line_len(len: usize, limit: Option<usize>) -> Result<(), WireError> {
    match limit {
        Some(limit) if len > limit => Err(WireError::LineTooLong { len, limit }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_newline_stays_pending() {
        let mut lines = LineSplitter::new();
        assert!(lines.push("data: {\"chu").is_empty());
        assert_eq!(lines.pending(), "data: {\"chu");
    }

    #[test]
    fn pending_tail_joins_next_push() {
        let mut lines = LineSplitter::new();
        assert_eq!(lines.push("a\nb"), vec!["a"]);
        assert_eq!(lines.push("c\n\n"), vec!["bc", ""]);
        assert_eq!(lines.pending(), "");
    }

    #[test]
    fn multiple_lines_in_one_push() {
        let mut lines = LineSplitter::new();
        assert_eq!(lines.push("one\ntwo\nthree"), vec!["one", "two"]);
        assert_eq!(lines.take_pending(), "three");
        assert_eq!(lines.pending(), "");
    }

    #[test]
    fn carriage_return_is_kept() {
        let mut lines = LineSplitter::new();
        assert_eq!(lines.push("x\r\n"), vec!["x\r"]);
    }

    #[test]
    fn empty_push_is_a_no_op() {
        let mut lines = LineSplitter::new();
        lines.push("abc");
        assert!(lines.push("").is_empty());
        assert_eq!(lines.pending(), "abc");
    }

    #[test]
    fn line_len_within_limit() {
        assert!(check_line_len(10, Some(10)).is_ok());
        assert!(check_line_len(usize::MAX, None).is_ok());
    }

    #[test]
    fn line_len_over_limit() {
        let err = check_line_len(11, Some(10)).unwrap_err();
        assert!(matches!(err, WireError::LineTooLong { len: 11, limit: 10 }));
        assert_eq!(err.to_string(), "line of 11 bytes exceeds limit of 10 bytes");
    }
}
