//! HTTP channel to the remote responder.
//!
//! One user submission maps to exactly one POST of `{"message": ...}` to the
//! configured endpoint; the success body is a JSON object with a `reply`
//! string. No retries. Failures are categorized so the caller can show the
//! user what kind of thing went wrong.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

/// Standard User-Agent header for Grove requests.
pub const USER_AGENT: &str = concat!("grove/", env!("CARGO_PKG_VERSION"));

/// Substitute reply when the responder answers 2xx without a `reply` field.
pub const MISSING_REPLY_FALLBACK: &str = "No response from AI";

/// Categories of responder failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderErrorKind {
    /// Could not reach the responder at all.
    Connect,
    /// The request timed out.
    Timeout,
    /// The responder answered with a non-success status.
    HttpStatus,
    /// The response body was not the expected JSON shape.
    Parse,
}

impl fmt::Display for ResponderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponderErrorKind::Connect => write!(f, "connect"),
            ResponderErrorKind::Timeout => write!(f, "timeout"),
            ResponderErrorKind::HttpStatus => write!(f, "http_status"),
            ResponderErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured responder failure with category and details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderError {
    pub kind: ResponderErrorKind,
    pub message: String,
}

impl ResponderError {
    pub fn new(kind: ResponderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text shown in the transcript as an assistant message when a request
    /// fails. Communicates the failure category, never a stack trace.
    pub fn transcript_message(&self) -> String {
        match self.kind {
            ResponderErrorKind::Connect => {
                "Cannot connect to the responder. Check that it is running and reachable."
                    .to_string()
            }
            ResponderErrorKind::Timeout => {
                "The responder took too long to answer. Please try again.".to_string()
            }
            ResponderErrorKind::HttpStatus => {
                format!("The responder reported an error ({}).", self.message)
            }
            ResponderErrorKind::Parse => {
                "The responder sent a reply that could not be understood.".to_string()
            }
        }
    }
}

impl fmt::Display for ResponderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ResponderError {}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskReply {
    reply: Option<String>,
}

/// Client for the remote responder endpoint.
#[derive(Debug, Clone)]
pub struct Responder {
    client: reqwest::Client,
    endpoint: String,
}

impl Responder {
    /// Builds a responder client from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.responder_url.clone(), config.request_timeout())
    }

    pub fn new(endpoint: String, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // The builder only fails on TLS backend misconfiguration; fall back
        // to the default client rather than surfacing a startup error.
        let client = builder.build().unwrap_or_default();
        Self { client, endpoint }
    }

    /// Sends one message and returns the reply text.
    ///
    /// A 2xx body without a `reply` field yields the fixed fallback string
    /// instead of an error.
    pub async fn ask(&self, message: &str) -> Result<String, ResponderError> {
        debug!(endpoint = %self.endpoint, "sending message to responder");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&AskRequest { message })
            .send()
            .await
            .map_err(categorize_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResponderError::new(
                ResponderErrorKind::HttpStatus,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body: AskReply = response.json().await.map_err(|e| {
            ResponderError::new(ResponderErrorKind::Parse, format!("invalid reply body: {e}"))
        })?;

        Ok(body
            .reply
            .unwrap_or_else(|| MISSING_REPLY_FALLBACK.to_string()))
    }
}

fn categorize_transport_error(e: reqwest::Error) -> ResponderError {
    if e.is_timeout() {
        ResponderError::new(ResponderErrorKind::Timeout, e.to_string())
    } else if e.is_connect() {
        ResponderError::new(ResponderErrorKind::Connect, e.to_string())
    } else {
        // Treat anything else transport-shaped as a connectivity failure.
        ResponderError::new(ResponderErrorKind::Connect, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn responder_for(server: &MockServer) -> Responder {
        Responder::new(format!("{}/api/chat", server.uri()), None)
    }

    #[tokio::test]
    async fn test_ask_returns_reply_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({"message": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "reply": "Hi!"
            })))
            .mount(&server)
            .await;

        let reply = responder_for(&server).ask("hello").await.unwrap();
        assert_eq!(reply, "Hi!");
    }

    #[tokio::test]
    async fn test_ask_missing_reply_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let reply = responder_for(&server).ask("hello").await.unwrap();
        assert_eq!(reply, MISSING_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn test_ask_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = responder_for(&server).ask("hello").await.unwrap_err();
        assert_eq!(err.kind, ResponderErrorKind::HttpStatus);
        assert!(err.message.contains("500"));
    }

    #[tokio::test]
    async fn test_ask_non_json_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = responder_for(&server).ask("hello").await.unwrap_err();
        assert_eq!(err.kind, ResponderErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_ask_unreachable_endpoint_is_connect_error() {
        // Port 9 (discard) is closed on any sane test host.
        let responder = Responder::new("http://127.0.0.1:9/api/chat".to_string(), None);

        let err = responder.ask("hello").await.unwrap_err();
        assert_eq!(err.kind, ResponderErrorKind::Connect);
    }

    #[test]
    fn test_transcript_messages_name_the_category() {
        let connect = ResponderError::new(ResponderErrorKind::Connect, "refused");
        assert!(connect.transcript_message().contains("connect"));

        let status = ResponderError::new(ResponderErrorKind::HttpStatus, "HTTP 503");
        assert!(status.transcript_message().contains("HTTP 503"));
    }
}
