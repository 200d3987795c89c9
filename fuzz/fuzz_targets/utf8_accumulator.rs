#![no_main]

use chatline_wire::Utf8Accumulator;
use libfuzzer_sys::fuzz_target;

// Fuzz target: streaming UTF-8 decoding.
//
// Pushing the input in pieces (sizes taken from the input itself) and
// finishing must equal `String::from_utf8_lossy` of the whole input.
fuzz_target!(|data: &[u8]| {
    let Some((&step, bytes)) = data.split_first() else {
        return;
    };
    let step = usize::from(step % 8) + 1;

    let mut acc = Utf8Accumulator::new();
    let mut out = String::new();
    for piece in bytes.chunks(step) {
        out.push_str(&acc.push(piece));
    }
    out.push_str(&acc.finish());

    assert_eq!(out, String::from_utf8_lossy(bytes));
});
