#![no_main]

use chatline_decoder::decode_all;
use libfuzzer_sys::fuzz_target;

// Fuzz target: StreamDecoder over arbitrary bytes.
//
// Catches bugs in:
// - Panics on malformed UTF-8, JSON, or line structure
// - Events emitted after a terminal event
// - Termination state disagreeing with the events returned
fuzz_target!(|data: &[u8]| {
    let stream = decode_all(data);

    let terminals = stream.events.iter().filter(|e| e.is_terminal()).count();
    assert!(terminals <= 1, "more than one terminal event");
    if terminals == 1 {
        assert!(stream.events.last().is_some_and(|e| e.is_terminal()));
    }
    assert_eq!(terminals == 1, stream.termination.is_some());
});
