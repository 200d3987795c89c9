#![no_main]

use chatline_types::{Record, StreamEvent};
use libfuzzer_sys::fuzz_target;

// Fuzz target: Record::from_json on any JSON value.
//
// Catches bugs in:
// - Panics on unexpected value types
// - Empty chunks or errors leaking into events
// - A record producing more than one terminal event
fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let events = Record::from_json(&value).into_events();

    assert!(events.len() <= 2);
    assert!(events.iter().filter(|e| e.is_terminal()).count() <= 1);
    for event in &events {
        match event {
            StreamEvent::Chunk { text } => assert!(!text.is_empty()),
            StreamEvent::Failure { message } => assert!(!message.is_empty()),
            StreamEvent::Done => {}
        }
    }
});
