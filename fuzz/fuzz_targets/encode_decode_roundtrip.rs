#![no_main]

use arbitrary::Arbitrary;
use chatline_decoder::{decode_chunks, StreamDecoder, Termination};
use chatline_encoder::StreamEncoder;
use chatline_types::StreamEvent;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzLine {
    Chunk(String),
    KeepAlive,
    Comment(String),
}

#[derive(Debug, Arbitrary)]
enum FuzzEnding {
    Done,
    Error(String),
    None,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    lines: Vec<FuzzLine>,
    ending: FuzzEnding,
    piece: u8,
}

// Fuzz target: encode arbitrary lines, decode in arbitrary-sized pieces.
//
// Every non-empty chunk must come back in order, and the termination must
// match the ending that was encoded.
fuzz_target!(|input: FuzzInput| {
    let mut encoder = StreamEncoder::new();
    let mut expected = Vec::new();
    for line in &input.lines {
        match line {
            FuzzLine::Chunk(text) => {
                encoder.chunk(text.as_str());
                if !text.is_empty() {
                    expected.push(StreamEvent::chunk(text.as_str()));
                }
            }
            FuzzLine::KeepAlive => {
                encoder.keep_alive();
            }
            // Comments with newlines are rejected by the encoder.
            FuzzLine::Comment(text) if !text.contains('\n') => {
                encoder.comment(text.as_str());
            }
            FuzzLine::Comment(_) => {}
        }
    }
    let termination = match &input.ending {
        FuzzEnding::Done => {
            encoder.done();
            expected.push(StreamEvent::Done);
            Some(Termination::Done)
        }
        FuzzEnding::Error(message) if !message.is_empty() => {
            encoder.error(message.as_str());
            expected.push(StreamEvent::failure(message.as_str()));
            Some(Termination::Failure {
                message: message.clone(),
            })
        }
        FuzzEnding::Error(_) | FuzzEnding::None => None,
    };

    let Ok(bytes) = encoder.encode() else {
        return;
    };
    let piece = usize::from(input.piece).max(1);
    let stream = decode_chunks(
        StreamDecoder::new().with_max_line_len(None),
        bytes.chunks(piece),
    );

    assert_eq!(stream.events, expected);
    assert_eq!(stream.termination, termination);
    assert!(stream.diagnostics.is_empty());
});
