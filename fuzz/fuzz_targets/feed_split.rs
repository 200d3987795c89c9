#![no_main]

use chatline_decoder::{decode_chunks, DecodedStream, StreamDecoder, Termination};
use libfuzzer_sys::fuzz_target;

// Fuzz target: chunking independence.
//
// The first two bytes pick a cut point and a line cap; the rest is the
// stream. Decoding it in two pieces must match decoding it whole, apart
// from the observed length of an overflowing line.
fuzz_target!(|data: &[u8]| {
    let [cut, cap, stream @ ..] = data else {
        return;
    };
    let cut = usize::from(*cut).min(stream.len());
    let cap = Some(usize::from(*cap).max(1));

    let whole = decode_chunks(StreamDecoder::new().with_max_line_len(cap), [stream]);
    let split = decode_chunks(
        StreamDecoder::new().with_max_line_len(cap),
        [&stream[..cut], &stream[cut..]],
    );
    assert_eq!(normalize(whole), normalize(split));
});

fn normalize(mut stream: DecodedStream) -> DecodedStream {
    if let Some(Termination::LineTooLong { len, .. }) = &mut stream.termination {
        *len = 0;
    }
    stream
}
