#![warn(clippy::pedantic)]

pub mod client;
pub mod config;
pub mod conversation;
pub mod csrf;
pub mod error;
pub mod render;
pub mod session;

pub use client::{ChatClient, ChunkSource, drive_stream, replay};
pub use config::ClientConfig;
pub use conversation::Conversation;
pub use csrf::cookie_value;
pub use error::ClientError;
pub use render::{HtmlRenderer, Renderer, TranscriptRenderer, WriterRenderer, escape_html};
pub use session::{Session, SessionError, SessionState, Speaker, Turn};
