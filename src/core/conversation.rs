//! # Conversation Store
//!
//! Ordered, append-only message history plus the chat in-flight flag.
//! The only non-append mutation is [`Conversation::revert`], used when the
//! backend rejects a send with a validation error.

use crate::api::WireMessage;
use crate::core::message::Message;

/// Seed message shown before any user interaction.
pub const WELCOME_MESSAGE: &str = "🛡️ CyRA Security Assistant initialized. I'm here to help analyze ISRO's cybersecurity posture. You can ask me about:\n\n\
• Malware detections and threats\n\
• Failed login attempts and authentication issues\n\
• Network anomalies and traffic analysis\n\
• Threat intelligence and active attacks\n\
• Security compliance and system status\n\n\
What would you like to investigate today?";

/// Opaque marker for a past conversation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    is_loading: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant_text(WELCOME_MESSAGE)],
            is_loading: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.messages.len())
    }

    /// Restores the history to exactly what it was at `checkpoint`.
    /// History is append-only, so truncation is a full restore.
    pub fn revert(&mut self, checkpoint: Checkpoint) {
        self.messages.truncate(checkpoint.0);
    }

    /// The full history with every entry's content coerced to a string.
    pub fn to_wire(&self) -> Vec<WireMessage> {
        self.messages.iter().map(Message::to_wire).collect()
    }
}
