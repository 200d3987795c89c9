/// Implementation of `chatline stream`.
///
/// Posts one message to the streaming endpoint and writes each fragment to
/// stdout as soon as it is decoded.
///
/// ```text
/// $ chatline stream "Explain lifetimes in one sentence"
/// A lifetime names the region of code in which a reference is valid.
/// ```
///
/// A server `error` record, a truncated stream, or an over-long line is
/// shown inline after the partial reply and also makes the command exit
/// with code 1.
use std::io;

use anyhow::{Context, Result};
use chatline_client::WriterRenderer;

use crate::SendArgs;

/// Run the `chatline stream` command.
///
/// # Errors
///
/// Returns an error if the message is invalid, the request fails, the
/// stream ends without `done`, or stdout cannot be written.
pub async fn run(args: &SendArgs) -> Result<()> {
    let client = args.connection.client()?;
    let mut renderer = WriterRenderer::new(io::stdout());

    let outcome = client.send_streaming(&args.message, &mut renderer).await;
    renderer.into_result().context("cannot write to stdout")?;
    outcome.context("reply did not complete")?;
    Ok(())
}
