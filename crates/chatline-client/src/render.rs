use std::fmt::Write as _;
use std::io;

/// Display surface for an in-progress reply.
///
/// The client drives a renderer while a reply streams in; the renderer
/// never sees the transport or the decoder. Exactly one of
/// [`finish`](Self::finish) or [`fail`](Self::fail) is called per reply.
///
/// ```text
///   begin() ──▶ append("Hel") ──▶ append("lo") ──▶ finish("Hello")
///                                        └──────▶ fail("model unavailable")
/// ```
pub trait Renderer {
    /// The reply is about to stream (show a typing indicator, open a bubble).
    fn begin(&mut self) {}

    /// Append a fragment of assistant text.
    fn append(&mut self, text: &str);

    /// The reply completed; `full_text` is everything appended so far.
    fn finish(&mut self, full_text: &str);

    /// The reply failed or was cut off.
    fn fail(&mut self, message: &str);
}

/// In-memory renderer that records what it was asked to show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranscriptRenderer {
    pub began: bool,
    pub text: String,
    pub finished: Option<String>,
    pub error: Option<String>,
}

impl Renderer for TranscriptRenderer {
    fn begin(&mut self) {
        self.began = true;
    }

    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn finish(&mut self, full_text: &str) {
        self.finished = Some(full_text.to_owned());
    }

    fn fail(&mut self, message: &str) {
        self.error = Some(message.to_owned());
    }
}

/// Renderer that writes fragments to a byte sink as they arrive, for
/// terminals and pipes.
///
/// Write errors do not interrupt the reply; the first one is kept and
/// returned by [`into_result`](Self::into_result).
pub struct WriterRenderer<W: io::Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: io::Write> WriterRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Return the sink, or the first write error seen.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error raised while rendering.
    pub fn into_result(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

impl<W: io::Write> Renderer for WriterRenderer<W> {
    fn append(&mut self, text: &str) {
        self.write(text);
    }

    fn finish(&mut self, full_text: &str) {
        if !full_text.ends_with('\n') {
            self.write("\n");
        }
    }

    fn fail(&mut self, message: &str) {
        self.write(&format!("\nError: {message}\n"));
    }
}

/// Escape the five HTML-significant characters.
///
/// ```rust
/// use chatline_client::escape_html;
///
/// assert_eq!(
///     escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
/// );
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renderer that builds chat-bubble markup for a web transcript.
///
/// User messages are added with [`user_message`](Self::user_message);
/// assistant replies become a bubble when they finish, and failures become
/// an alert. All text is escaped.
#[derive(Clone, Debug, Default)]
pub struct HtmlRenderer {
    html: String,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_message(&mut self, text: &str) {
        self.bubble("chat-end", "You", "chat-bubble-primary", text);
    }

    /// Markup rendered so far.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    fn bubble(&mut self, side: &str, header: &str, style: &str, text: &str) {
        let _ = writeln!(
            self.html,
            "<div class=\"chat {side} mb-4\"><div class=\"chat-header\">{header}</div>\
             <div class=\"chat-bubble {style}\">{}</div></div>",
            escape_html(text)
        );
    }
}

impl Renderer for HtmlRenderer {
    fn append(&mut self, _text: &str) {}

    fn finish(&mut self, full_text: &str) {
        self.bubble("chat-start", "Assistant", "chat-bubble-accent", full_text);
    }

    fn fail(&mut self, message: &str) {
        let _ = writeln!(
            self.html,
            "<div class=\"alert alert-error mb-4\"><span>Error: {}</span></div>",
            escape_html(message)
        );
    }
}
