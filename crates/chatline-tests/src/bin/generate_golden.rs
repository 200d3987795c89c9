//! Golden fixture generator for the chatline conformance suite.
//!
//! Writes every `.sse` capture under `tests/golden/`. Run it after changing
//! the encoder's output format, then review the conformance snapshots.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p chatline-tests
//! ```
//!
//! # Generated fixtures
//!
//! | File                     | Contents                                          |
//! |--------------------------|---------------------------------------------------|
//! | simple.sse               | Two chunks and `done`                             |
//! | multibyte.sse            | Accented, inverted-punctuation and emoji chunks   |
//! | server_error.sse         | A chunk, then an `error` record                   |
//! | truncated.sse            | Two chunks, no terminal record                    |
//! | noisy.sse                | Comments, keep-alives, bad JSON, input after done |
//! | done_wins.sse            | One record carrying chunk, done and error         |
//! | crlf.sse                 | CRLF line endings                                 |
//! | unterminated_final.sse   | `done` without a trailing newline                 |

#![allow(clippy::pedantic)]

use std::path::Path;

use chatline_encoder::StreamEncoder;
use chatline_types::Record;

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");

    let simple = StreamEncoder::new()
        .chunk("Hello")
        .chunk(", world!")
        .done()
        .encode()
        .expect("encode simple");
    write_file(&golden_dir.join("simple.sse"), &simple);

    let multibyte = StreamEncoder::new()
        .chunks(["¿Qué ", "tal? ", "🦀 ñ"])
        .done()
        .encode()
        .expect("encode multibyte");
    write_file(&golden_dir.join("multibyte.sse"), &multibyte);

    let server_error = StreamEncoder::new()
        .chunk("Partial ")
        .error("model unavailable")
        .encode()
        .expect("encode server_error");
    write_file(&golden_dir.join("server_error.sse"), &server_error);

    let truncated = StreamEncoder::new()
        .chunk("The answer ")
        .chunk("is")
        .encode()
        .expect("encode truncated");
    write_file(&golden_dir.join("truncated.sse"), &truncated);

    let noisy = StreamEncoder::new()
        .comment("connected")
        .keep_alive()
        .raw_line("event: message")
        .chunk("A")
        .raw_line("data: {not json")
        .raw_line(r#"data:{"chunk":"no space"}"#)
        .keep_alive()
        .chunk("B")
        .done()
        .raw_line(r#"data: {"chunk":"late"}"#)
        .encode()
        .expect("encode noisy");
    write_file(&golden_dir.join("noisy.sse"), &noisy);

    let done_wins = StreamEncoder::new()
        .record(Record {
            chunk: Some("last".into()),
            done: true,
            error: Some("ignored".into()),
        })
        .encode()
        .expect("encode done_wins");
    write_file(&golden_dir.join("done_wins.sse"), &done_wins);

    let crlf = StreamEncoder::new()
        .raw_line("data: {\"chunk\":\"win\"}\r")
        .raw_line("data: {\"done\":true}\r")
        .encode()
        .expect("encode crlf");
    write_file(&golden_dir.join("crlf.sse"), &crlf);

    let mut unterminated = StreamEncoder::new()
        .chunk("kept")
        .done()
        .encode()
        .expect("encode unterminated_final");
    unterminated.pop();
    write_file(&golden_dir.join("unterminated_final.sse"), &unterminated);

    println!("All golden fixtures written to {}", golden_dir.display());
}

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}
