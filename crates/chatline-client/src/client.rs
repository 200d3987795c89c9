use std::future::Future;

use bytes::Bytes;
use chatline_decoder::{DecodeError, DecodedStream, StreamDecoder, Termination};
use chatline_types::{ChatReply, ChatRequest, StreamEvent, validate_message};
use chatline_wire::WireError;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::render::Renderer;

/// An ordered source of body chunks that ends with `Ok(None)`.
///
/// Implemented for [`reqwest::Response`]; tests and other transports can
/// supply their own.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Bytes>, ClientError>> + Send;
}

impl ChunkSource for reqwest::Response {
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Bytes>, ClientError>> + Send {
        async move { Ok(self.chunk().await?) }
    }
}

/// HTTP client for the chat backend.
///
/// # Example
///
/// ```no_run
/// use chatline_client::{ChatClient, ClientConfig, WriterRenderer};
///
/// # async fn run() -> Result<(), chatline_client::ClientError> {
/// let client = ChatClient::new(
///     ClientConfig::default()
///         .base_url("http://localhost:8000")
///         .csrf_token("token-from-cookie"),
/// )?;
///
/// let mut out = WriterRenderer::new(std::io::stdout());
/// let reply = client.send_streaming("Hello", &mut out).await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ChatClient {
    /// Build a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `message` to the plain endpoint and return the reply text.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidMessage`] for empty or over-long input.
    /// - [`ClientError::Server`] if the reply carries an `error` field,
    ///   whatever the status code.
    /// - [`ClientError::Status`] for other non-2xx responses.
    /// - [`ClientError::InvalidReply`] if a 2xx body is not JSON.
    /// - [`ClientError::Http`] for transport failures.
    pub async fn send(&self, message: &str) -> Result<String, ClientError> {
        let message = validate_message(message)?;
        let url = self.config.message_url();
        debug!(%url, chars = message.chars().count(), "sending message");

        let response = self.post(&url, message).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let reply = serde_json::from_str::<ChatReply>(&body);
        if let Some(error) = reply.as_ref().ok().and_then(ChatReply::error) {
            return Err(ClientError::Server(error.to_owned()));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply = reply.map_err(ClientError::InvalidReply)?;
        Ok(reply.text().to_owned())
    }

    /// Send `message` to the streaming endpoint, render the reply as it
    /// arrives, and return the full text.
    ///
    /// `renderer` is told about every outcome, success or not, so a caller
    /// that only displays errors through the renderer can ignore the
    /// returned error.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidMessage`] for empty or over-long input
    ///   (nothing is rendered).
    /// - [`ClientError::Status`] for a non-2xx response.
    /// - [`ClientError::Server`] for an `error` record.
    /// - [`ClientError::Decode`] if the stream is truncated or a line
    ///   exceeds the configured cap.
    /// - [`ClientError::Http`] for transport failures.
    pub async fn send_streaming(
        &self,
        message: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<String, ClientError> {
        let message = validate_message(message)?;
        let url = self.config.stream_url();
        debug!(%url, chars = message.chars().count(), "opening stream");

        let mut response = match self.post(&url, message).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                renderer.fail(&err.to_string());
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::Status {
                status: status.as_u16(),
                body,
            };
            renderer.fail(&err.to_string());
            return Err(err);
        }

        let decoder = StreamDecoder::new().with_max_line_len(self.config.max_line_len);
        renderer.begin();
        drive_stream(&mut response, decoder, renderer).await
    }

    fn post(&self, url: &str, message: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.post(url).json(&ChatRequest {
            message: message.to_owned(),
        });
        if let Some(token) = &self.config.csrf_token {
            request = request.header(self.config.csrf_header.as_str(), token.as_str());
        }
        request
    }
}

/// The streaming read loop: read a chunk, feed the decoder, hand events to
/// the renderer, repeat.
///
/// Returns the concatenated chunk text once `done` arrives. Every failure
/// path calls [`Renderer::fail`] before returning.
///
/// # Errors
///
/// - [`ClientError::Server`] for an `error` record.
/// - [`ClientError::Decode`] with [`DecodeError::Truncated`] if the source
///   ends first, or [`DecodeError::Wire`] if a line exceeds the cap.
/// - Any error returned by the source itself.
pub async fn drive_stream<S: ChunkSource>(
    source: &mut S,
    mut decoder: StreamDecoder,
    renderer: &mut dyn Renderer,
) -> Result<String, ClientError> {
    let mut reply = String::new();

    loop {
        let chunk = match source.next_chunk().await {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, "stream transport failed");
                renderer.fail(&e.to_string());
                return Err(e);
            }
        };

        let Some(bytes) = chunk else {
            decoder.finalize();
            let err = ClientError::Decode(DecodeError::Truncated);
            warn!(received = reply.len(), "stream closed without a terminal record");
            renderer.fail(&err.to_string());
            return Err(err);
        };

        for event in decoder.feed(&bytes) {
            match event {
                StreamEvent::Chunk { text } => {
                    renderer.append(&text);
                    reply.push_str(&text);
                }
                StreamEvent::Done => {
                    renderer.finish(&reply);
                    return Ok(reply);
                }
                StreamEvent::Failure { message } => {
                    renderer.fail(&message);
                    return Err(match decoder.termination() {
                        Some(&Termination::LineTooLong { len, limit }) => {
                            ClientError::Decode(WireError::LineTooLong { len, limit }.into())
                        }
                        _ => ClientError::Server(message),
                    });
                }
            }
        }
    }
}

/// Drive `renderer` with an already-decoded stream the way
/// [`drive_stream`] would have driven it live, including the failure for a
/// stream that never terminated.
pub fn replay(stream: &DecodedStream, renderer: &mut dyn Renderer) {
    renderer.begin();
    let mut text = String::new();
    for event in &stream.events {
        match event {
            StreamEvent::Chunk { text: fragment } => {
                renderer.append(fragment);
                text.push_str(fragment);
            }
            StreamEvent::Done => renderer.finish(&text),
            StreamEvent::Failure { message } => renderer.fail(message),
        }
    }
    if stream.termination.is_none() {
        renderer.fail(&DecodeError::Truncated.to_string());
    }
}
