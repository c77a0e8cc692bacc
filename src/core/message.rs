//! # Messages
//!
//! A conversation message carries either free text or a structured payload.
//! The split is a real enum rather than an untyped field, so every consumer
//! (renderer, wire coercion) has to handle both arms.

use log::warn;
use serde_json::Value;

pub use crate::api::Role;
use crate::api::{ChatEnvelope, ResponseType, StructuredPayload, WireMessage};

#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Structured(StructuredPayload),
}

impl MessageContent {
    /// Coerces the content to the string the chat endpoint accepts.
    /// Structured payloads become their JSON text.
    pub fn to_wire_string(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Structured(payload) => {
                serde_json::to_string(payload).unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    /// Declared reply type, recorded only for structured assistant replies.
    pub response_type: Option<ResponseType>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
            response_type: None,
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
            response_type: None,
        }
    }

    pub fn assistant_structured(payload: StructuredPayload, response_type: ResponseType) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Structured(payload),
            response_type: Some(response_type),
        }
    }

    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            role: self.role,
            content: self.content.to_wire_string(),
        }
    }
}

/// Renders any JSON value as display text. Strings pass through unquoted;
/// a missing value becomes the empty string.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turns a chat reply envelope into the assistant message to append.
///
/// - Declared `text`, or any string `response`: a text message.
/// - Otherwise the response is decoded as a table/chart payload, tagged with
///   the declared type (`text` when none was declared).
/// - A response that fails to decode is kept as its JSON text so the UI
///   never rejects a reply.
pub fn interpret_reply(envelope: ChatEnvelope) -> Message {
    let declared = envelope.declared_type();

    if declared == Some(ResponseType::Text) || envelope.response.is_string() {
        return Message::assistant_text(stringify(&envelope.response));
    }

    match serde_json::from_value::<StructuredPayload>(envelope.response.clone()) {
        Ok(payload) => {
            Message::assistant_structured(payload, declared.unwrap_or(ResponseType::Text))
        }
        Err(e) => {
            warn!(
                "Unrecognized {:?} reply shape ({}), showing it as text",
                envelope.response_type, e
            );
            Message {
                role: Role::Assistant,
                content: MessageContent::Text(stringify(&envelope.response)),
                response_type: declared,
            }
        }
    }
}
