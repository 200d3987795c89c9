/// Implementation of `chatline send`.
///
/// Posts one message to the plain endpoint and prints the reply text on
/// stdout. A reply carrying an `error` field is reported as an error even
/// when the status is 2xx.
use anyhow::{Context, Result};

use crate::SendArgs;

/// Run the `chatline send` command.
///
/// # Errors
///
/// Returns an error if the message is invalid, the request fails, or the
/// server reports an error.
pub async fn run(args: &SendArgs) -> Result<()> {
    let client = args.connection.client()?;
    let reply = client
        .send(&args.message)
        .await
        .with_context(|| format!("no reply from {}", client.config().message_url()))?;
    println!("{reply}");
    Ok(())
}
