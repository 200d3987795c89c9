#![warn(clippy::pedantic)]

pub mod error;
pub mod event;
pub mod message;
pub mod record;

pub use error::TypeError;
pub use event::StreamEvent;
pub use message::{
  CharCount, CharLevel, ChatReply, ChatRequest, MAX_MESSAGE_CHARS, validate_message,
};
pub use record::Record;
