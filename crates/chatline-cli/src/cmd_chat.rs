/// Implementation of `chatline chat`.
///
/// A line-based chat session. Each line read from stdin is one message;
/// replies stream to stdout (or print whole with `--no-stream`).
///
/// ```text
/// > What is a borrow?
/// A borrow is a reference that lets you use a value without owning it.
/// > /quit
/// ```
///
/// Drafts past 800 characters show a `count/1000` indicator on stderr.
/// Ctrl-C while a reply is pending abandons it and returns to the prompt.
use std::future::Future;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use chatline_client::{ClientError, Conversation, WriterRenderer};
use chatline_types::{CharCount, CharLevel};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::ChatArgs;

/// Run the `chatline chat` command until end of input or `/quit`.
///
/// Errors from individual exchanges are shown and the session continues.
///
/// # Errors
///
/// Returns an error if the client cannot be built or stdin/stdout fail.
pub async fn run(args: &ChatArgs) -> Result<()> {
    let mut conversation = Conversation::new(args.connection.client()?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!(
        "Connected to {}. Type /quit to leave.",
        conversation.client().config().base_url
    );

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.context("cannot read stdin")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" {
            break;
        }

        let count = CharCount::of(input);
        if count.level() != CharLevel::Normal {
            eprintln!("[{count}]");
        }

        exchange(&mut conversation, input, args.no_stream).await?;
    }

    Ok(())
}

async fn exchange(conversation: &mut Conversation, input: &str, no_stream: bool) -> Result<()> {
    let mut renderer = WriterRenderer::new(io::stdout());

    let outcome = if no_stream {
        cancellable(conversation.submit(input)).await
    } else {
        cancellable(conversation.submit_streaming(input, &mut renderer)).await
    };
    renderer.into_result().context("cannot write to stdout")?;

    match outcome {
        None => {
            conversation.abort();
            eprintln!("\n(cancelled)");
        }
        Some(Ok(reply)) => {
            if no_stream {
                println!("{reply}");
            }
        }
        // Rejected before anything was sent, so the renderer never saw it.
        Some(Err(e @ (ClientError::InvalidMessage(_) | ClientError::Session(_)))) => {
            eprintln!("Error: {e}");
        }
        Some(Err(e)) => {
            if no_stream {
                println!("Error: {e}");
            }
        }
    }
    Ok(())
}

/// Run `work` unless Ctrl-C arrives first.
async fn cancellable<T>(work: impl Future<Output = T>) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        _ = tokio::signal::ctrl_c() => None,
    }
}

fn prompt() -> Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")
        .and_then(|()| stdout.flush())
        .context("cannot write to stdout")
}
