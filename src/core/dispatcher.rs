//! Turns a submitted line into one backend request and the reply text.
//!
//! Only the last stored message travels with the new user text; the backend
//! never sees the whole transcript. Every failure collapses into
//! [`REQUEST_ERROR_MESSAGE`] for the user, while the log keeps the kind.

use crate::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::core::message::Message;
use crate::core::mode::Mode;
use crate::utils::url::mode_endpoint;
use reqwest::StatusCode;
use std::error::Error as StdError;
use std::fmt;
use tracing::{debug, error};

pub const REQUEST_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";

#[derive(Debug)]
pub enum DispatchError {
    /// The context window could not be encoded into the request body.
    Encode(serde_json::Error),

    /// The request never produced a response (connect, DNS, reset, body read).
    Network(reqwest::Error),

    /// The backend answered with a non-success status.
    Status { status: StatusCode, body: String },

    /// The body was not `{"response": "<string>"}`.
    Parse(serde_json::Error),
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Encode(_) => "encode",
            DispatchError::Network(_) => "network",
            DispatchError::Status { .. } => "status",
            DispatchError::Parse(_) => "parse",
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Encode(source) => write!(f, "Failed to encode request: {source}"),
            DispatchError::Network(source) => write!(f, "Request failed: {source}"),
            DispatchError::Status { status, body } => {
                write!(f, "Backend returned status {status}: {body}")
            }
            DispatchError::Parse(source) => write!(f, "Malformed backend response: {source}"),
        }
    }
}

impl StdError for DispatchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DispatchError::Encode(source) | DispatchError::Parse(source) => Some(source),
            DispatchError::Network(source) => Some(source),
            DispatchError::Status { .. } => None,
        }
    }
}

/// The trailing message of `history` (if any) followed by the new user text.
pub fn context_window(history: &[Message], text: &str) -> Vec<ChatMessage> {
    history
        .last()
        .map(ChatMessage::from)
        .into_iter()
        .chain(std::iter::once(ChatMessage::from(&Message::user(text))))
        .collect()
}

#[derive(Clone)]
pub struct RequestDispatcher {
    client: reqwest::Client,
    backend_route: String,
}

impl RequestDispatcher {
    pub fn new(backend_route: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), backend_route)
    }

    pub fn with_client(client: reqwest::Client, backend_route: impl Into<String>) -> Self {
        Self {
            client,
            backend_route: backend_route.into(),
        }
    }

    pub fn backend_route(&self) -> &str {
        &self.backend_route
    }

    pub fn endpoint(&self, mode: Mode) -> String {
        mode_endpoint(&self.backend_route, mode)
    }

    /// Send the context window and return the reply, or the fixed error text.
    pub async fn dispatch(&self, endpoint: &str, context: &[ChatMessage]) -> String {
        match self.try_dispatch(endpoint, context).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(kind = err.kind(), endpoint, error = %err, "chat request failed");
                REQUEST_ERROR_MESSAGE.to_string()
            }
        }
    }

    pub async fn try_dispatch(
        &self,
        endpoint: &str,
        context: &[ChatMessage],
    ) -> Result<String, DispatchError> {
        let body = ChatRequest::from_messages(context).map_err(DispatchError::Encode)?;
        debug!(endpoint, turns = context.len(), "posting chat request");

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(DispatchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DispatchError::Status { status, body });
        }

        let text = response.text().await.map_err(DispatchError::Network)?;
        let parsed: ChatResponse = serde_json::from_str(&text).map_err(DispatchError::Parse)?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{spawn_mock_backend, test_client, MockReply};

    #[test]
    fn context_window_keeps_only_the_last_message() {
        let history = vec![
            Message::user("one"),
            Message::assistant("two"),
            Message::user("three"),
            Message::assistant("four"),
        ];
        let window = context_window(&history, "five");
        assert_eq!(
            window,
            vec![
                ChatMessage {
                    role: "assistant".to_string(),
                    content: "four".to_string()
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "five".to_string()
                },
            ]
        );
    }

    #[test]
    fn context_window_for_empty_chat_is_just_the_new_text() {
        let window = context_window(&[], "Hello");
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].role, "user");
        assert_eq!(window[0].content, "Hello");
    }

    #[tokio::test]
    async fn successful_reply_returns_response_field() {
        let backend = spawn_mock_backend(vec![MockReply::json(200, r#"{"response":"Hi there"}"#)]).await;
        let dispatcher = RequestDispatcher::with_client(test_client(), backend.route());

        let endpoint = dispatcher.endpoint(Mode::Rag);
        let reply = dispatcher
            .dispatch(&endpoint, &context_window(&[], "Hello"))
            .await;

        assert_eq!(reply, "Hi there");
        let requests = backend.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].request_line.starts_with("POST /api/routes/chat/ "));
        assert!(requests[0].content_type.starts_with("application/json"));
        let body: ChatRequest = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body.message, r#"[{"role":"user","content":"Hello"}]"#);
    }

    #[tokio::test]
    async fn consensus_mode_posts_to_suffixed_endpoint() {
        let backend = spawn_mock_backend(vec![MockReply::json(200, r#"{"response":"agreed"}"#)]).await;
        let dispatcher = RequestDispatcher::with_client(test_client(), backend.route());

        let endpoint = dispatcher.endpoint(Mode::Consensus);
        let reply = dispatcher.dispatch(&endpoint, &context_window(&[], "q")).await;

        assert_eq!(reply, "agreed");
        let requests = backend.requests().await;
        assert!(requests[0]
            .request_line
            .starts_with("POST /api/routes/chat/consensus "));
    }

    #[tokio::test]
    async fn server_error_is_tagged_as_status() {
        let backend = spawn_mock_backend(vec![MockReply::json(500, r#"{"detail":"boom"}"#)]).await;
        let dispatcher = RequestDispatcher::with_client(test_client(), backend.route());

        let err = dispatcher
            .try_dispatch(&dispatcher.endpoint(Mode::Rag), &context_window(&[], "q"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "status");
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn malformed_body_is_tagged_as_parse_and_collapsed() {
        let backend = spawn_mock_backend(vec![
            MockReply::json(200, "not json"),
            MockReply::json(200, r#"{"answer":"wrong field"}"#),
        ])
        .await;
        let dispatcher = RequestDispatcher::with_client(test_client(), backend.route());
        let endpoint = dispatcher.endpoint(Mode::Rag);

        let err = dispatcher
            .try_dispatch(&endpoint, &context_window(&[], "q"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "parse");

        let reply = dispatcher.dispatch(&endpoint, &context_window(&[], "q")).await;
        assert_eq!(reply, REQUEST_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_backend_is_tagged_as_network() {
        // Bind then drop a listener so the port is very likely closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dispatcher =
            RequestDispatcher::with_client(test_client(), format!("http://{addr}/api/routes/chat/"));
        let endpoint = dispatcher.endpoint(Mode::Rag);
        let err = dispatcher
            .try_dispatch(&endpoint, &context_window(&[], "q"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network");
        assert_eq!(
            dispatcher.dispatch(&endpoint, &context_window(&[], "q")).await,
            REQUEST_ERROR_MESSAGE
        );
    }
}
