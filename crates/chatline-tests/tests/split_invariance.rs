//! Chunking must not matter: any split of a stream across `feed` calls
//! yields the same events, termination and diagnostics as a single call.
//!
//! Every golden capture is checked exhaustively at every one- and two-cut
//! split point; proptest then covers arbitrary splits of generated streams,
//! including ones that cut through multi-byte characters and hit the line
//! cap.

use std::path::Path;

use chatline_decoder::{DecodedStream, StreamDecoder, Termination, decode_chunks};
use chatline_encoder::StreamEncoder;
use chatline_wire::Utf8Accumulator;
use proptest::prelude::*;

const CAPTURES: [&str; 8] = [
    "simple.sse",
    "multibyte.sse",
    "server_error.sse",
    "truncated.sse",
    "noisy.sse",
    "done_wins.sse",
    "crlf.sse",
    "unterminated_final.sse",
];

fn golden(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden")
        .join(name);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()))
}

fn whole(bytes: &[u8], cap: Option<usize>) -> DecodedStream {
    decode_chunks(StreamDecoder::new().with_max_line_len(cap), [bytes])
}

/// Decode `bytes` cut at the given ascending offsets.
fn split_at(bytes: &[u8], cuts: &[usize], cap: Option<usize>) -> DecodedStream {
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        pieces.push(&bytes[start..cut]);
        start = cut;
    }
    pieces.push(&bytes[start..]);
    decode_chunks(StreamDecoder::new().with_max_line_len(cap), pieces)
}

/// Clear the observed length of an overflow, which legitimately depends on
/// where the cut fell.
fn without_overflow_len(mut stream: DecodedStream) -> DecodedStream {
    if let Some(Termination::LineTooLong { len, .. }) = &mut stream.termination {
        *len = 0;
    }
    stream
}

// ── Exhaustive ────────────────────────────────────────────────────────────────

#[test]
fn every_single_cut() {
    for name in CAPTURES {
        let bytes = golden(name);
        let expected = whole(&bytes, None);
        for cut in 0..=bytes.len() {
            assert_eq!(split_at(&bytes, &[cut], None), expected, "{name} cut at {cut}");
        }
    }
}

#[test]
fn every_pair_of_cuts() {
    for name in CAPTURES {
        let bytes = golden(name);
        let expected = whole(&bytes, None);
        for a in 0..=bytes.len() {
            for b in a..=bytes.len() {
                assert_eq!(
                    split_at(&bytes, &[a, b], None),
                    expected,
                    "{name} cut at {a} and {b}"
                );
            }
        }
    }
}

#[test]
fn byte_at_a_time() {
    for name in CAPTURES {
        let bytes = golden(name);
        let pieces: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(
            decode_chunks(StreamDecoder::new(), pieces),
            whole(&bytes, None),
            "{name}"
        );
    }
}

// ── Property-based ────────────────────────────────────────────────────────────

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{1,12}",
        "[àéîõü¿¡ñ]{1,6}",
        Just("🦀".to_string()),
        Just("\"quoted\" \\ back".to_string()),
        Just("line\nbreak".to_string()),
    ]
}

#[derive(Clone, Debug)]
enum Piece {
    Chunk(String),
    KeepAlive,
    Comment,
    Garbage,
    Malformed,
}

fn arb_piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        4 => arb_fragment().prop_map(Piece::Chunk),
        1 => Just(Piece::KeepAlive),
        1 => Just(Piece::Comment),
        1 => Just(Piece::Garbage),
        1 => Just(Piece::Malformed),
    ]
}

#[derive(Clone, Copy, Debug)]
enum Ending {
    Done,
    Error,
    Truncated,
}

fn arb_stream() -> impl Strategy<Value = Vec<u8>> {
    (
        proptest::collection::vec(arb_piece(), 0..12),
        prop_oneof![Just(Ending::Done), Just(Ending::Error), Just(Ending::Truncated)],
    )
        .prop_map(|(pieces, ending)| {
            let mut encoder = StreamEncoder::new();
            encoder.comment("start");
            for piece in pieces {
                match piece {
                    Piece::Chunk(text) => encoder.chunk(text),
                    Piece::KeepAlive => encoder.keep_alive(),
                    Piece::Comment => encoder.comment("ping"),
                    Piece::Garbage => encoder.raw_line("event: message"),
                    Piece::Malformed => encoder.raw_line("data: {\"chunk\": tru"),
                };
            }
            match ending {
                Ending::Done => encoder.done(),
                Ending::Error => encoder.error("server went away"),
                Ending::Truncated => &mut encoder,
            };
            encoder.encode().expect("generated stream encodes")
        })
}

/// A stream plus ascending cut offsets within it.
fn arb_split_stream() -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    arb_stream().prop_flat_map(|bytes| {
        let len = bytes.len();
        (
            Just(bytes),
            proptest::collection::vec(0..=len, 0..8).prop_map(|mut cuts| {
                cuts.sort_unstable();
                cuts
            }),
        )
    })
}

proptest! {
    #[test]
    fn random_splits_match_single_feed((bytes, cuts) in arb_split_stream()) {
        prop_assert_eq!(split_at(&bytes, &cuts, None), whole(&bytes, None));
    }

    #[test]
    fn line_cap_is_split_independent(
        (bytes, cuts) in arb_split_stream(),
        cap in 8usize..64,
    ) {
        prop_assert_eq!(
            without_overflow_len(split_at(&bytes, &cuts, Some(cap))),
            without_overflow_len(whole(&bytes, Some(cap)))
        );
    }

    #[test]
    fn utf8_accumulator_matches_lossy(
        bytes in proptest::collection::vec(any::<u8>(), 0..64),
        cuts in proptest::collection::vec(0usize..64, 0..6),
    ) {
        let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(bytes.len())).collect();
        cuts.sort_unstable();

        let mut acc = Utf8Accumulator::new();
        let mut out = String::new();
        let mut start = 0;
        for cut in cuts {
            out.push_str(&acc.push(&bytes[start..cut]));
            start = cut;
        }
        out.push_str(&acc.push(&bytes[start..]));
        out.push_str(&acc.finish());

        prop_assert_eq!(out, String::from_utf8_lossy(&bytes).into_owned());
    }
}
