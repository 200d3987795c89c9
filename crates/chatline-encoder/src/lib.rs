#![warn(clippy::pedantic)]

pub mod encoder;
pub mod error;

pub use encoder::{StreamEncoder, split_words};
pub use error::EncodeError;
