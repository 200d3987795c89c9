/// Implementation of `chatline decode`.
///
/// Reads a captured stream, runs it through [`StreamDecoder`] (optionally
/// in fixed-size pieces, to reproduce how a network delivered it) and
/// prints the result.
///
/// # Output formats
///
/// ```text
/// ┌────────┬──────────────────────────────────────────────────────────────┐
/// │ Format │ Output                                                       │
/// ├────────┼──────────────────────────────────────────────────────────────┤
/// │ text   │ the reply as a terminal would show it (default)              │
/// │ events │ one line per event, then skipped lines and the termination   │
/// │ html   │ the reply as a chat bubble or error alert                    │
/// └────────┴──────────────────────────────────────────────────────────────┘
/// ```
///
/// ```text
/// $ chatline decode --format events reply.sse
/// chunk    "Hel"
/// chunk    "lo"
/// done
/// skipped  line 3: key must be a string at line 1 column 2
/// ```
use std::fs;
use std::io;

use anyhow::{Context, Result, anyhow};
use chatline_client::{HtmlRenderer, WriterRenderer, replay};
use chatline_decoder::{DecodedStream, StreamDecoder, Termination, decode_chunks};
use chatline_types::StreamEvent;

use crate::DecodeArgs;

/// Run the `chatline decode` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a flag value is invalid,
/// or stdout cannot be written. A stream that failed or was truncated is
/// still printed and is not an error here; use `chatline validate` for
/// that.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let piece = match args.chunk_size {
        Some(0) => return Err(anyhow!("--chunk-size must be at least 1")),
        Some(n) => n,
        None => bytes.len().max(1),
    };
    let decoder = StreamDecoder::new().with_max_line_len(Some(args.max_line_len));
    let stream = decode_chunks(decoder, bytes.chunks(piece));

    match args.format.as_str() {
        "text" => {
            let mut renderer = WriterRenderer::new(io::stdout());
            replay(&stream, &mut renderer);
            renderer.into_result().context("cannot write to stdout")?;
        }
        "events" => print!("{}", event_listing(&stream)),
        "html" => {
            let mut renderer = HtmlRenderer::new();
            replay(&stream, &mut renderer);
            print!("{}", renderer.into_html());
        }
        other => {
            return Err(anyhow!(
                "unknown format '{other}': expected text, events, or html"
            ));
        }
    }
    Ok(())
}

/// One line per event, then one per skipped line, then a closing line if
/// the stream did not end with a terminal record.
fn event_listing(stream: &DecodedStream) -> String {
    let mut out = String::new();
    for event in &stream.events {
        let line = match event {
            StreamEvent::Chunk { text } => format!("chunk    {text:?}"),
            StreamEvent::Done => "done".to_string(),
            StreamEvent::Failure { message } => format!("failure  {message:?}"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    for diagnostic in &stream.diagnostics {
        out.push_str(&format!(
            "skipped  line {}: {}\n",
            diagnostic.line, diagnostic.reason
        ));
    }
    match &stream.termination {
        Some(Termination::LineTooLong { limit, .. }) => {
            out.push_str(&format!("overflow line exceeded {limit} bytes\n"));
        }
        None => out.push_str("truncated\n"),
        Some(Termination::Done | Termination::Failure { .. }) => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_decoder::decode_all;

    #[test]
    fn listing_names_every_event() {
        let stream = decode_all(
            b"data: {\"chunk\":\"Hel\"}\ndata: {oops\ndata: {\"chunk\":\"lo\"}\ndata: {\"done\":true}\n",
        );
        let listing = event_listing(&stream);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "chunk    \"Hel\"");
        assert_eq!(lines[1], "chunk    \"lo\"");
        assert_eq!(lines[2], "done");
        assert!(lines[3].starts_with("skipped  line 2: "));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn listing_marks_truncation() {
        let stream = decode_all(b"data: {\"chunk\":\"cut\"}\n");
        assert_eq!(event_listing(&stream), "chunk    \"cut\"\ntruncated\n");
    }
}
