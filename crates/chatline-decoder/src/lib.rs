#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod streaming;

pub use decoder::{DecodedStream, Diagnostic, StreamDecoder, Termination, decode_all, decode_chunks};
pub use error::DecodeError;
pub use streaming::StreamingDecoder;
