use chatline_types::validate_message;

use crate::error::ClientError;

/// Whether a reply is outstanding.
///
/// ```text
///            begin()                 complete() / fail() / abort()
///   Idle ───────────────▶ AwaitingResponse ───────────────────────▶ Idle
///                              │  begin()
///                              └────────▶ Err(Busy)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Invalid [`Session`] transitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a reply is still pending")]
    Busy,

    #[error("no reply is pending")]
    NotAwaiting,
}

/// Who a transcript entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    /// An error shown in place of an assistant reply.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// Chat session: the submit guard plus the transcript shown so far.
#[derive(Clone, Debug, Default)]
pub struct Session {
    state: SessionState,
    transcript: Vec<Turn>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Start a new exchange with `input`.
    ///
    /// The input is validated and trimmed, recorded as a user turn, and
    /// returned for sending.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Busy`] if a reply is still pending.
    /// - [`ClientError::InvalidMessage`] if the input is empty or too long;
    ///   the state is left unchanged.
    pub fn begin(&mut self, input: &str) -> Result<String, ClientError> {
        if self.state == SessionState::AwaitingResponse {
            return Err(SessionError::Busy.into());
        }
        let message = validate_message(input)?.to_owned();
        self.push(Speaker::User, message.clone());
        self.state = SessionState::AwaitingResponse;
        Ok(message)
    }

    /// Record the assistant's reply and return to idle.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAwaiting`] if no exchange is in progress.
    pub fn complete(&mut self, reply: &str) -> Result<(), SessionError> {
        self.settle(Speaker::Assistant, reply)
    }

    /// Record an error in place of the reply and return to idle.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAwaiting`] if no exchange is in progress.
    pub fn fail(&mut self, message: &str) -> Result<(), SessionError> {
        self.settle(Speaker::Error, message)
    }

    /// Return to idle without recording anything, e.g. after the caller
    /// abandoned a pending request.
    pub fn abort(&mut self) {
        self.state = SessionState::Idle;
    }

    fn settle(&mut self, speaker: Speaker, text: &str) -> Result<(), SessionError> {
        if self.state != SessionState::AwaitingResponse {
            return Err(SessionError::NotAwaiting);
        }
        self.push(speaker, text.to_owned());
        self.state = SessionState::Idle;
        Ok(())
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.transcript.push(Turn { speaker, text });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_types::TypeError;

    #[test]
    fn full_exchange() {
        let mut session = Session::new();
        assert_eq!(session.begin("  hola  ").unwrap(), "hola");
        assert_eq!(session.state(), SessionState::AwaitingResponse);
        session.complete("¡Hola!").unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        let speakers: Vec<Speaker> = session.transcript().iter().map(|t| t.speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Assistant]);
    }

    #[test]
    fn second_begin_is_busy() {
        let mut session = Session::new();
        session.begin("first").unwrap();
        let err = session.begin("second").unwrap_err();
        assert!(matches!(err, ClientError::Session(SessionError::Busy)));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn invalid_input_leaves_state_idle() {
        let mut session = Session::new();
        let err = session.begin("   ").unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidMessage(TypeError::EmptyMessage)
        ));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn failure_is_recorded() {
        let mut session = Session::new();
        session.begin("q").unwrap();
        session.fail("model unavailable").unwrap();
        assert_eq!(
            session.transcript()[1],
            Turn {
                speaker: Speaker::Error,
                text: "model unavailable".into()
            }
        );
    }

    #[test]
    fn complete_without_begin_is_rejected() {
        let mut session = Session::new();
        assert_eq!(session.complete("x"), Err(SessionError::NotAwaiting));
        assert_eq!(session.fail("x"), Err(SessionError::NotAwaiting));
    }

    #[test]
    fn abort_frees_the_session() {
        let mut session = Session::new();
        session.begin("q").unwrap();
        session.abort();
        assert!(session.begin("again").is_ok());
    }
}
