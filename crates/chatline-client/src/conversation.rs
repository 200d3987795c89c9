use tracing::debug;

use crate::client::ChatClient;
use crate::error::ClientError;
use crate::render::Renderer;
use crate::session::Session;

/// A [`ChatClient`] paired with the [`Session`] that guards it.
///
/// Each submit validates the input, refuses to start while a reply is
/// pending, sends, and records the outcome in the transcript. Failed
/// exchanges are recorded as [`Speaker::Error`](crate::Speaker::Error)
/// turns and the session returns to idle.
pub struct Conversation {
    client: ChatClient,
    session: Session,
}

impl Conversation {
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            session: Session::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Abandon a pending exchange, e.g. after the submit future was dropped.
    pub fn abort(&mut self) {
        self.session.abort();
    }

    /// Send `input` to the plain endpoint.
    ///
    /// # Errors
    ///
    /// Returns the [`Session::begin`] error if the input is rejected,
    /// otherwise any error from [`ChatClient::send`].
    pub async fn submit(&mut self, input: &str) -> Result<String, ClientError> {
        let message = self.session.begin(input)?;
        let outcome = self.client.send(&message).await;
        self.settle(outcome)
    }

    /// Send `input` to the streaming endpoint, rendering as it arrives.
    ///
    /// # Errors
    ///
    /// Returns the [`Session::begin`] error if the input is rejected,
    /// otherwise any error from [`ChatClient::send_streaming`].
    pub async fn submit_streaming(
        &mut self,
        input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<String, ClientError> {
        let message = self.session.begin(input)?;
        let outcome = self.client.send_streaming(&message, renderer).await;
        self.settle(outcome)
    }

    fn settle(&mut self, outcome: Result<String, ClientError>) -> Result<String, ClientError> {
        match outcome {
            Ok(reply) => {
                self.session.complete(&reply)?;
                Ok(reply)
            }
            Err(e) => {
                debug!(error = %e, "exchange failed");
                self.session.fail(&e.to_string())?;
                Err(e)
            }
        }
    }
}
