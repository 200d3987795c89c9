#![warn(clippy::pedantic)]

pub mod error;
pub mod frame;
pub mod line;
pub mod utf8;

pub use error::WireError;
pub use frame::{DATA_PREFIX, data_payload, write_data_line};
pub use line::{DEFAULT_MAX_LINE_LEN, LineSplitter, check_line_len};
pub use utf8::Utf8Accumulator;
