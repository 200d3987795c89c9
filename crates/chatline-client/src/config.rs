use std::time::Duration;

use chatline_wire::DEFAULT_MAX_LINE_LEN;

use crate::csrf::cookie_value;

/// Configuration for [`ChatClient`](crate::ChatClient).
///
/// ```text
/// ┌──────────────┬──────────────────────────────┬──────────────────────────────────┐
/// │ Field        │ Default                      │ Purpose                          │
/// ├──────────────┼──────────────────────────────┼──────────────────────────────────┤
/// │ base_url     │ http://127.0.0.1:8000        │ Scheme, host, and port           │
/// │ message_path │ /chat/api/chat/              │ Plain request/response endpoint  │
/// │ stream_path  │ /chat/api/chat/stream/       │ Streaming endpoint               │
/// │ csrf_cookie  │ csrftoken                    │ Cookie holding the token         │
/// │ csrf_header  │ X-CSRFToken                  │ Header the token is sent in      │
/// │ csrf_token   │ none                         │ Anti-forgery token, if known     │
/// │ timeout      │ 60 s                         │ Whole-request timeout            │
/// │ max_line_len │ 1 MiB                        │ Stream line cap (None = no cap)  │
/// └──────────────┴──────────────────────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub message_path: String,
    pub stream_path: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
    pub csrf_token: Option<String>,
    pub timeout: Duration,
    pub max_line_len: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            message_path: "/chat/api/chat/".into(),
            stream_path: "/chat/api/chat/stream/".into(),
            csrf_cookie: "csrftoken".into(),
            csrf_header: "X-CSRFToken".into(),
            csrf_token: None,
            timeout: Duration::from_secs(60),
            max_line_len: Some(DEFAULT_MAX_LINE_LEN),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn message_path(mut self, path: impl Into<String>) -> Self {
        self.message_path = path.into();
        self
    }

    #[must_use]
    pub fn stream_path(mut self, path: impl Into<String>) -> Self {
        self.stream_path = path.into();
        self
    }

    #[must_use]
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Take the anti-forgery token from a `Cookie` header value, using the
    /// configured cookie name. Leaves the token unchanged if the cookie is
    /// absent.
    #[must_use]
    pub fn csrf_from_cookies(mut self, cookie_header: &str) -> Self {
        if let Some(token) = cookie_value(cookie_header, &self.csrf_cookie) {
            self.csrf_token = Some(token);
        }
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_line_len(mut self, limit: Option<usize>) -> Self {
        self.max_line_len = limit;
        self
    }

    /// Full URL of the plain endpoint.
    #[must_use]
    pub fn message_url(&self) -> String {
        join_url(&self.base_url, &self.message_path)
    }

    /// Full URL of the streaming endpoint.
    #[must_use]
    pub fn stream_url(&self) -> String {
        join_url(&self.base_url, &self.stream_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_urls() {
        let config = ClientConfig::default();
        assert_eq!(config.message_url(), "http://127.0.0.1:8000/chat/api/chat/");
        assert_eq!(
            config.stream_url(),
            "http://127.0.0.1:8000/chat/api/chat/stream/"
        );
    }

    #[test]
    fn slashes_are_normalised() {
        let config = ClientConfig::default()
            .base_url("https://example.org/")
            .message_path("api/message/");
        assert_eq!(config.message_url(), "https://example.org/api/message/");
    }

    #[test]
    fn csrf_from_cookie_header() {
        let config =
            ClientConfig::default().csrf_from_cookies("sessionid=abc; csrftoken=tok%3D1");
        assert_eq!(config.csrf_token.as_deref(), Some("tok=1"));
    }

    #[test]
    fn missing_cookie_keeps_explicit_token() {
        let config = ClientConfig::default()
            .csrf_token("explicit")
            .csrf_from_cookies("sessionid=abc");
        assert_eq!(config.csrf_token.as_deref(), Some("explicit"));
    }
}
