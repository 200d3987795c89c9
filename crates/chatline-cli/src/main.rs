/// chatline command-line tool: talk to a chat backend over its plain or
/// streaming endpoint, and decode or validate captured `data:` streams.
///
/// # Command overview
///
/// ```text
/// chatline <COMMAND> [OPTIONS]
///
/// Commands:
///   send       Send one message and print the reply
///   stream     Send one message and print the reply as it streams
///   chat       Interactive chat session
///   decode     Decode a captured stream file
///   validate   Check a captured stream file for well-formedness
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder and HTTP activity to stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                          |
/// |------|--------------------------------------------------|
/// | 0    | Success                                          |
/// | 1    | Error (I/O, HTTP, server error, invalid stream)  |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use chatline_client::{ChatClient, ClientConfig};
use chatline_wire::DEFAULT_MAX_LINE_LEN;
use clap::{Parser, Subcommand};
use tracing::Level;

mod cmd_chat;
mod cmd_decode;
mod cmd_send;
mod cmd_stream;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Chat client for `data:`-streaming backends.
#[derive(Parser)]
#[command(name = "chatline", version, about = "Streaming chat client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder and HTTP activity to stderr at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Send one message to the plain endpoint and print the reply.
    Send(SendArgs),
    /// Send one message to the streaming endpoint and print the reply as it
    /// arrives.
    Stream(SendArgs),
    /// Start an interactive chat session.
    Chat(ChatArgs),
    /// Decode a captured stream file.
    Decode(DecodeArgs),
    /// Check a captured stream file for well-formedness.
    Validate(ValidateArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Connection settings shared by the commands that talk to a server.
///
/// ```text
/// ┌────────────────┬───────────────────────┬──────────────────────────────────┐
/// │ Flag           │ Environment           │ Default                          │
/// ├────────────────┼───────────────────────┼──────────────────────────────────┤
/// │ --base-url     │ CHATLINE_BASE_URL     │ http://127.0.0.1:8000            │
/// │ --csrf-token   │ CHATLINE_CSRF_TOKEN   │ none                             │
/// │ --cookie       │ CHATLINE_COOKIE       │ none (token read from csrftoken) │
/// │ --timeout      │                       │ 60 seconds                       │
/// │ --max-line-len │                       │ 1048576 bytes                    │
/// │ --no-line-cap  │                       │ off                              │
/// └────────────────┴───────────────────────┴──────────────────────────────────┘
/// ```
///
/// An explicit `--csrf-token` takes precedence over one found in `--cookie`.
#[derive(clap::Args)]
pub struct ConnectionArgs {
    /// Scheme, host, and port of the chat backend.
    #[arg(long, env = "CHATLINE_BASE_URL", default_value = "http://127.0.0.1:8000")]
    pub base_url: String,

    /// Anti-forgery token sent in the `X-CSRFToken` header.
    #[arg(long, env = "CHATLINE_CSRF_TOKEN")]
    pub csrf_token: Option<String>,

    /// A `Cookie` header value to read the `csrftoken` cookie from.
    #[arg(long, env = "CHATLINE_COOKIE")]
    pub cookie: Option<String>,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Longest accepted stream line, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,

    /// Accept stream lines of any length.
    #[arg(long, conflicts_with = "max_line_len")]
    pub no_line_cap: bool,
}

impl ConnectionArgs {
    /// Build the client described by these flags.
    pub fn client(&self) -> Result<ChatClient> {
        let mut config = ClientConfig::default()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout))
            .max_line_len((!self.no_line_cap).then_some(self.max_line_len));
        if let Some(cookie) = &self.cookie {
            config = config.csrf_from_cookies(cookie);
        }
        if let Some(token) = &self.csrf_token {
            config = config.csrf_token(token);
        }
        ChatClient::new(config).context("cannot build HTTP client")
    }
}

/// Arguments for `chatline send` and `chatline stream`.
#[derive(clap::Args)]
pub struct SendArgs {
    /// The message to send (trimmed; 1 to 1000 characters).
    pub message: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments for `chatline chat`.
///
/// Reads one message per line from stdin until end of input or `/quit`.
/// Ctrl-C cancels a pending reply without leaving the session.
#[derive(clap::Args)]
pub struct ChatArgs {
    /// Use the plain endpoint instead of the streaming one.
    #[arg(long)]
    pub no_stream: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments for `chatline decode`.
///
/// ```text
/// ┌────────────────┬────────────────────────────────────────────────────┐
/// │ Flag           │ Values / default                                   │
/// ├────────────────┼────────────────────────────────────────────────────┤
/// │ --format       │ text (default) | events | html                     │
/// │ --chunk-size   │ feed the decoder N bytes at a time (default: all)  │
/// │ --max-line-len │ line cap in bytes (default 1048576)                │
/// └────────────────┴────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Path to the captured stream.
    pub file: PathBuf,

    /// Output format: `text`, `events`, or `html`.
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Feed the decoder this many bytes at a time.
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Longest accepted line, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,
}

/// Arguments for `chatline validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the captured stream.
    pub file: PathBuf,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Send(args) => cmd_send::run(&args).await,
        Commands::Stream(args) => cmd_stream::run(&args).await,
        Commands::Chat(args) => cmd_chat::run(&args).await,
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
