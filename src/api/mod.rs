//! Wire payloads exchanged with the chat backend.

use crate::core::message::Message;
use serde::{Deserialize, Serialize};

/// One `{role, content}` entry inside the encoded context window.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(value: &Message) -> Self {
        Self {
            role: value.role.as_str().to_string(),
            content: value.content.clone(),
        }
    }
}

/// Request body. `message` carries the context window as a JSON *string*,
/// not as a nested array; the backend decodes it a second time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn from_messages(messages: &[ChatMessage]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            message: serde_json::to_string(messages)?,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub response: String,
}
