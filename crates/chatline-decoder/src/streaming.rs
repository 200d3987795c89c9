use std::collections::VecDeque;

use chatline_types::StreamEvent;
use chatline_wire::WireError;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::decoder::{StreamDecoder, Termination};
use crate::error::DecodeError;

/// Size of a single transport read.
const READ_CHUNK: usize = 8 * 1024;

/// Asynchronous adapter that drives a [`StreamDecoder`] from any
/// `AsyncRead` source (files, TCP sockets, HTTP response bodies, etc.).
///
/// Events are yielded one at a time. The reader is only polled when the
/// queue of already-decoded events is empty, so backpressure follows the
/// caller: nothing is read until the next event is awaited.
///
/// Unlike the synchronous decoder, this adapter owns the end of the
/// stream and reports how it ended:
///
/// ```text
///   Chunk ... Done            ──▶ Ok(Chunk) ... Ok(Done), then None
///   Chunk ... Failure(msg)    ──▶ Ok(Chunk) ... Ok(Failure), then None
///   Chunk ... <eof>           ──▶ Ok(Chunk) ... Err(Truncated), then None
///   Chunk ... <huge line>     ──▶ Ok(Chunk) ... Err(Wire(LineTooLong)), then None
///   <read error>              ──▶ Err(Io), then None
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use chatline_decoder::StreamingDecoder;
/// use tokio::io::AsyncRead;
///
/// async fn print_reply(reader: impl AsyncRead + Unpin) {
///     let mut stream = StreamingDecoder::new(reader);
///     while let Some(event) = stream.next().await {
///         println!("{event:?}");
///     }
/// }
/// ```
pub struct StreamingDecoder<R> {
  reader: R,
  decoder: StreamDecoder,
  queue: VecDeque<StreamEvent>,
  state: StreamState,
  /// Read buffer, reused across reads.
  buf: Vec<u8>,
}

/// ```text
///   Reading → Draining → Done
/// ```
///
/// `Draining` is entered once the decoder has terminated or the reader hit
/// end of stream; the queue is emptied, then the outcome is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
  Reading,
  Draining,
  Done,
}

impl<R: AsyncRead + Unpin> StreamingDecoder<R> {
  /// Create an adapter with a default [`StreamDecoder`].
  #[must_use]
  pub fn new(reader: R) -> Self {
    Self::with_decoder(reader, StreamDecoder::new())
  }

  /// Create an adapter around a preconfigured decoder.
  #[must_use]
  pub fn with_decoder(reader: R, decoder: StreamDecoder) -> Self {
    Self {
      reader,
      decoder,
      queue: VecDeque::new(),
      state: StreamState::Reading,
      buf: vec![0u8; READ_CHUNK],
    }
  }

  /// The underlying decoder, e.g. to inspect its diagnostics.
  #[must_use]
  pub fn decoder(&self) -> &StreamDecoder {
    &self.decoder
  }

  /// Read the next event from the stream.
  ///
  /// Returns `Some(Ok(event))` for each decoded event, `Some(Err(_))` once
  /// if the stream ended badly, and `None` after that.
  pub async fn next(&mut self) -> Option<Result<StreamEvent, DecodeError>> {
    loop {
      if let Some(event) = self.queue.pop_front() {
        return Some(Ok(event));
      }

      match self.state {
        StreamState::Reading => {}
        StreamState::Draining => {
          self.state = StreamState::Done;
          return self.outcome();
        }
        StreamState::Done => return None,
      }

      let n = match self.reader.read(&mut self.buf).await {
        Ok(n) => n,
        Err(e) => {
          self.state = StreamState::Done;
          return Some(Err(DecodeError::Io(e)));
        }
      };

      if n == 0 {
        self.queue.extend(self.decoder.finalize());
        self.state = StreamState::Draining;
        continue;
      }

      let mut events = self.decoder.feed(&self.buf[..n]);
      if let Some(termination) = self.decoder.termination() {
        // An overflow is reported as an error, not as the decoder's
        // trailing Failure event.
        if matches!(termination, Termination::LineTooLong { .. }) {
          events.pop();
        }
        self.state = StreamState::Draining;
      }
      self.queue.extend(events);
    }
  }

  fn outcome(&self) -> Option<Result<StreamEvent, DecodeError>> {
    match self.decoder.termination() {
      None => Some(Err(DecodeError::Truncated)),
      Some(&Termination::LineTooLong { len, limit }) => {
        Some(Err(DecodeError::Wire(WireError::LineTooLong { len, limit })))
      }
      Some(Termination::Done | Termination::Failure { .. }) => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chatline_encoder::StreamEncoder;
  use tokio::io::AsyncWriteExt;

  /// Collect every item the adapter yields.
  async fn collect<R: AsyncRead + Unpin>(
    mut stream: StreamingDecoder<R>,
  ) -> Vec<Result<StreamEvent, DecodeError>> {
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
      items.push(item);
    }
    items
  }

  /// Deliver `payload` through a duplex pipe in pieces of at most
  /// `max_piece` bytes.
  fn piecewise(payload: Vec<u8>, max_piece: usize) -> tokio::io::DuplexStream {
    let (mut tx, rx) = tokio::io::duplex(max_piece);
    tokio::spawn(async move {
      let _ = tx.write_all(&payload).await;
    });
    rx
  }

  fn events_only(items: Vec<Result<StreamEvent, DecodeError>>) -> Vec<StreamEvent> {
    items.into_iter().map(Result::unwrap).collect()
  }

  #[tokio::test]
  async fn yields_chunks_then_done() {
    let payload = StreamEncoder::new()
      .chunk("Hel")
      .chunk("lo")
      .done()
      .encode()
      .unwrap();
    let items = collect(StreamingDecoder::new(payload.as_slice())).await;

    assert_eq!(
      events_only(items),
      vec![
        StreamEvent::chunk("Hel"),
        StreamEvent::chunk("lo"),
        StreamEvent::Done
      ]
    );
  }

  #[tokio::test]
  async fn small_reads_match_single_read() {
    let payload = StreamEncoder::new()
      .chunk("héllo ")
      .keep_alive()
      .chunk("wörld 🦀")
      .done()
      .encode()
      .unwrap();
    let items = collect(StreamingDecoder::new(piecewise(payload, 3))).await;

    assert_eq!(
      events_only(items),
      vec![
        StreamEvent::chunk("héllo "),
        StreamEvent::chunk("wörld 🦀"),
        StreamEvent::Done
      ]
    );
  }

  #[tokio::test]
  async fn failure_ends_without_error() {
    let payload = StreamEncoder::new()
      .chunk("partial")
      .error("model unavailable")
      .encode()
      .unwrap();
    let items = collect(StreamingDecoder::new(payload.as_slice())).await;

    assert_eq!(
      events_only(items),
      vec![
        StreamEvent::chunk("partial"),
        StreamEvent::failure("model unavailable")
      ]
    );
  }

  #[tokio::test]
  async fn eof_without_terminal_is_truncated() {
    let payload = StreamEncoder::new().chunk("cut").encode().unwrap();
    let mut items = collect(StreamingDecoder::new(payload.as_slice())).await;

    assert_eq!(items.len(), 2);
    assert!(matches!(items.pop(), Some(Err(DecodeError::Truncated))));
    assert!(matches!(items.pop(), Some(Ok(StreamEvent::Chunk { .. }))));
  }

  #[tokio::test]
  async fn empty_body_is_truncated() {
    let items = collect(StreamingDecoder::new(&b""[..])).await;
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(DecodeError::Truncated)));
  }

  #[tokio::test]
  async fn overflow_is_a_wire_error() {
    let payload = StreamEncoder::new()
      .chunk("ok")
      .chunk("x".repeat(100))
      .done()
      .encode()
      .unwrap();
    let decoder = StreamDecoder::new().with_max_line_len(Some(32));
    let items = collect(StreamingDecoder::with_decoder(payload.as_slice(), decoder)).await;

    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], Ok(StreamEvent::Chunk { text }) if text == "ok"));
    assert!(matches!(
      items[1],
      Err(DecodeError::Wire(WireError::LineTooLong { limit: 32, .. }))
    ));
  }

  #[tokio::test]
  async fn input_after_done_is_not_read_into_events() {
    let payload = StreamEncoder::new()
      .done()
      .raw_line(r#"data: {"chunk":"late"}"#)
      .encode()
      .unwrap();
    let items = collect(StreamingDecoder::new(piecewise(payload, 4))).await;

    assert_eq!(events_only(items), vec![StreamEvent::Done]);
  }

  #[tokio::test]
  async fn diagnostics_are_reachable() {
    let payload = StreamEncoder::new()
      .raw_line("data: {broken")
      .done()
      .encode()
      .unwrap();
    let mut stream = StreamingDecoder::new(payload.as_slice());
    while stream.next().await.is_some() {}

    assert_eq!(stream.decoder().diagnostics().len(), 1);
  }
}
