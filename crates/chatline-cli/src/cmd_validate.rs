/// Implementation of `chatline validate`.
///
/// Decodes a captured stream and checks that it is one a client would
/// accept without complaint: every `data:` payload parses, and the stream
/// ends with a terminal record.
///
/// # Success output
///
/// ```text
/// ✓ Records: 12 events decoded (11 chunks, 348 characters)
/// ✓ Payloads: every data line is valid JSON
/// ✓ Terminal: done
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Line 4: malformed record (EOF while parsing a string at line 1 column 9)
/// ✗ Terminal: stream ends without done or error
/// ```
///
/// A stream terminated by an `error` record is well-formed and passes; the
/// terminal line then reads `✓ Terminal: error ("...")`.
use std::fs;

use anyhow::{Context, Result, anyhow};
use chatline_decoder::{DecodedStream, Termination, decode_all};
use chatline_types::StreamEvent;

use crate::ValidateArgs;

/// Run the `chatline validate` command.
///
/// Prints a report to stdout and returns `Ok(())` if the stream is
/// well-formed.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or if any check fails.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let (report, ok) = check(&decode_all(&bytes));
    print!("{report}");
    if ok {
        Ok(())
    } else {
        Err(anyhow!("validation failed"))
    }
}

/// Build the report for a decoded stream and say whether it passed.
fn check(stream: &DecodedStream) -> (String, bool) {
    let mut report = String::new();
    let mut ok = true;

    let chunks: Vec<&str> = stream
        .events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::Chunk { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    let chars: usize = chunks.iter().map(|text| text.chars().count()).sum();
    report.push_str(&format!(
        "✓ Records: {} event{} decoded ({} chunk{}, {chars} characters)\n",
        stream.events.len(),
        plural(stream.events.len()),
        chunks.len(),
        plural(chunks.len()),
    ));

    if stream.diagnostics.is_empty() {
        report.push_str("✓ Payloads: every data line is valid JSON\n");
    } else {
        ok = false;
        for diagnostic in &stream.diagnostics {
            report.push_str(&format!(
                "✗ Line {}: malformed record ({})\n",
                diagnostic.line, diagnostic.reason
            ));
        }
    }

    match &stream.termination {
        Some(Termination::Done) => report.push_str("✓ Terminal: done\n"),
        Some(Termination::Failure { message }) => {
            report.push_str(&format!("✓ Terminal: error ({message:?})\n"));
        }
        Some(Termination::LineTooLong { limit, .. }) => {
            ok = false;
            report.push_str(&format!("✗ Terminal: a line exceeds {limit} bytes\n"));
        }
        None => {
            ok = false;
            report.push_str("✗ Terminal: stream ends without done or error\n");
        }
    }

    (report, ok)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_stream_passes() {
        let (report, ok) = check(&decode_all(
            b"data: {\"chunk\":\"Hi\"}\ndata: {\"done\":true}\n",
        ));
        assert!(ok);
        assert_eq!(
            report,
            "✓ Records: 2 events decoded (1 chunk, 2 characters)\n\
             ✓ Payloads: every data line is valid JSON\n\
             ✓ Terminal: done\n"
        );
    }

    #[test]
    fn error_terminated_stream_passes() {
        let (report, ok) = check(&decode_all(b"data: {\"error\":\"bad request\"}\n"));
        assert!(ok);
        assert!(report.ends_with("✓ Terminal: error (\"bad request\")\n"));
    }

    #[test]
    fn malformed_and_truncated_fail() {
        let (report, ok) = check(&decode_all(b"data: {\"chunk\":\"a\"}\ndata: nope\n"));
        assert!(!ok);
        assert!(report.contains("✗ Line 2: malformed record"));
        assert!(report.ends_with("✗ Terminal: stream ends without done or error\n"));
    }
}
